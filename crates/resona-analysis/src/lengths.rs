//! Per-filter time-domain lengths and the aggregate cutoff frequency.
//!
//! For each center frequency `f` with relative bandwidth `alpha` and
//! bandwidth offset `gamma`:
//!
//! ```text
//! Q      = filter_scale / alpha
//! fc     = f * (1 + 0.5 * window_bw / Q) + 0.5 * gamma
//! length = Q * sample_rate / (f + gamma / alpha)
//! ```
//!
//! The cutoff of the whole bank is the largest `fc`.

use crate::bandwidth::relative_bandwidth;
use crate::error::{AnalysisError, Result};
use crate::frequencies::FrequencySet;

/// Factor turning relative bandwidth into the default `gamma`
/// (ERB model constants 24.7 Hz and 0.108).
pub const GAMMA_PER_ALPHA: f64 = 24.7 / 0.108;

/// Approximate relative bandwidth of each window family, in FFT bins.
///
/// These are fixed approximations, not the exact equivalent noise bandwidth
/// of the resolved window.
const WINDOW_BANDWIDTHS: [(&str, f64); 2] = [("hann", 1.5), ("hamming", 1.36)];

/// Bandwidth used when a window family is not in the table.
const DEFAULT_WINDOW_BANDWIDTH: f64 = 1.0;

/// Relative bandwidth constant for a window family name (case-insensitive).
pub fn window_bandwidth(name: &str) -> f64 {
    WINDOW_BANDWIDTHS
        .iter()
        .find(|(family, _)| family.eq_ignore_ascii_case(name))
        .map_or(DEFAULT_WINDOW_BANDWIDTH, |&(_, bw)| bw)
}

/// Per-filter lengths and the cutoff frequency of a filter bank.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    /// Time-domain length of each filter, in (fractional) samples.
    pub lengths: Vec<f64>,
    /// Bandwidth offset applied to each filter.
    pub gamma: Vec<f64>,
    /// Relative bandwidth of each filter.
    pub alpha: Vec<f64>,
    /// Quality factor of each filter.
    pub q: Vec<f64>,
    /// Highest per-filter cutoff estimate, in Hz.
    pub f_cutoff: f64,
}

impl FilterPlan {
    /// Number of filters.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// True when the plan holds no filters.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Longest filter, in samples.
    pub fn max_length(&self) -> f64 {
        self.lengths.iter().copied().fold(0.0, f64::max)
    }
}

/// Computes [`FilterPlan`]s for a fixed sample rate and window.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterLengthPlanner {
    sample_rate: f64,
    window: String,
    filter_scale: f64,
    gamma: Option<f64>,
    alpha: Option<Vec<f64>>,
}

impl FilterLengthPlanner {
    /// Planner with a Hann window, unit filter scale, and derived gamma/alpha.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            window: "hann".to_string(),
            filter_scale: 1.0,
            gamma: None,
            alpha: None,
        }
    }

    /// Set the window family name used for the cutoff estimate.
    pub fn with_window(mut self, window: impl Into<String>) -> Self {
        self.window = window.into();
        self
    }

    /// Set the filter scale (must be positive).
    pub fn with_filter_scale(mut self, filter_scale: f64) -> Self {
        self.filter_scale = filter_scale;
        self
    }

    /// Use one bandwidth offset for every filter instead of deriving it.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Override the relative bandwidths instead of estimating them.
    pub fn with_alpha(mut self, alpha: Vec<f64>) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Window family name.
    pub fn window(&self) -> &str {
        &self.window
    }

    /// Filter scale.
    pub fn filter_scale(&self) -> f64 {
        self.filter_scale
    }

    /// Explicit gamma, if set.
    pub fn gamma(&self) -> Option<f64> {
        self.gamma
    }

    /// Compute lengths and cutoff for ascending, positive center frequencies.
    pub fn plan(&self, freqs: &[f64]) -> Result<FilterPlan> {
        if !(self.filter_scale.is_finite() && self.filter_scale > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "filter_scale must be positive, got {}",
                self.filter_scale
            )));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if let Some(g) = self.gamma.filter(|g| !(g.is_finite() && *g >= 0.0)) {
            return Err(AnalysisError::invalid(format!(
                "gamma must be non-negative, got {g}"
            )));
        }
        let freqs = FrequencySet::new(freqs.to_vec())?;
        let freqs = freqs.as_slice();

        let alpha = match &self.alpha {
            Some(alpha) if alpha.len() != freqs.len() => {
                return Err(AnalysisError::invalid(format!(
                    "alpha has {} entries for {} frequencies",
                    alpha.len(),
                    freqs.len()
                )));
            }
            Some(alpha) => {
                if let Some(a) = alpha.iter().find(|a| !(**a > 0.0 && **a < 1.0)) {
                    return Err(AnalysisError::invalid(format!(
                        "alpha must lie in (0, 1), got {a}"
                    )));
                }
                alpha.clone()
            }
            None => relative_bandwidth(freqs)?.alpha,
        };

        let gamma: Vec<f64> = match self.gamma {
            Some(g) => vec![g; freqs.len()],
            None => alpha.iter().map(|a| a * GAMMA_PER_ALPHA).collect(),
        };

        let q: Vec<f64> = alpha.iter().map(|a| self.filter_scale / a).collect();

        let window_bw = window_bandwidth(&self.window);
        let f_cutoff = freqs
            .iter()
            .zip(&q)
            .zip(&gamma)
            .map(|((f, q), g)| f * (1.0 + 0.5 * window_bw / q) + 0.5 * g)
            .fold(f64::NEG_INFINITY, f64::max);

        let lengths: Vec<f64> = freqs
            .iter()
            .zip(&q)
            .zip(gamma.iter().zip(&alpha))
            .map(|((f, q), (g, a))| q * self.sample_rate / (f + g / a))
            .collect();

        tracing::debug!(
            n_filters = lengths.len(),
            f_cutoff,
            window = %self.window,
            "planned filter lengths"
        );

        Ok(FilterPlan {
            lengths,
            gamma,
            alpha,
            q,
            f_cutoff,
        })
    }
}

/// Plan filter lengths in one call.
///
/// # Example
/// ```rust
/// use resona_analysis::lengths::wavelet_lengths;
///
/// let plan = wavelet_lengths(&[32.70, 65.41, 130.81], 22050.0, "hann", 1.0, Some(0.0), None).unwrap();
/// assert_eq!(plan.lengths.len(), 3);
/// assert!(plan.lengths[0] > plan.lengths[2]);
/// ```
pub fn wavelet_lengths(
    freqs: &[f64],
    sample_rate: f64,
    window: &str,
    filter_scale: f64,
    gamma: Option<f64>,
    alpha: Option<&[f64]>,
) -> Result<FilterPlan> {
    let mut planner = FilterLengthPlanner::new(sample_rate)
        .with_window(window)
        .with_filter_scale(filter_scale);
    if let Some(g) = gamma {
        planner = planner.with_gamma(g);
    }
    if let Some(a) = alpha {
        planner = planner.with_alpha(a.to_vec());
    }
    planner.plan(freqs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREQS: [f64; 3] = [32.70, 65.41, 130.81];

    #[test]
    fn test_window_bandwidth_table() {
        assert_eq!(window_bandwidth("hann"), 1.5);
        assert_eq!(window_bandwidth("Hamming"), 1.36);
        assert_eq!(window_bandwidth("kaiser"), 1.0);
    }

    #[test]
    fn test_closed_form_with_zero_gamma() {
        let plan = FilterLengthPlanner::new(22050.0)
            .with_gamma(0.0)
            .plan(&FREQS)
            .unwrap();
        let alpha = relative_bandwidth(&FREQS).unwrap().alpha;

        for i in 0..3 {
            let q = 1.0 / alpha[i];
            let expected = q * 22050.0 / FREQS[i];
            assert!((plan.lengths[i] - expected).abs() < 1e-9);
            assert_eq!(plan.gamma[i], 0.0);
        }

        let expected_cutoff = FREQS
            .iter()
            .zip(&alpha)
            .map(|(f, a)| f * (1.0 + 0.5 * 1.5 * a))
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((plan.f_cutoff - expected_cutoff).abs() < 1e-9);
    }

    #[test]
    fn test_derived_gamma() {
        let plan = FilterLengthPlanner::new(22050.0).plan(&FREQS).unwrap();
        for (g, a) in plan.gamma.iter().zip(&plan.alpha) {
            assert!((g - a * GAMMA_PER_ALPHA).abs() < 1e-12);
        }
        // Positive gamma shortens every filter
        let no_gamma = FilterLengthPlanner::new(22050.0)
            .with_gamma(0.0)
            .plan(&FREQS)
            .unwrap();
        for (with, without) in plan.lengths.iter().zip(&no_gamma.lengths) {
            assert!(with < without);
        }
    }

    #[test]
    fn test_alpha_override() {
        let plan = FilterLengthPlanner::new(1000.0)
            .with_alpha(vec![0.5, 0.5])
            .with_gamma(0.0)
            .plan(&[10.0, 100.0])
            .unwrap();
        assert!((plan.lengths[0] - 2.0 * 1000.0 / 10.0).abs() < 1e-9);
        assert!((plan.lengths[1] - 2.0 * 1000.0 / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_frequency_with_alpha() {
        let plan = FilterLengthPlanner::new(1000.0)
            .with_alpha(vec![0.25])
            .plan(&[100.0])
            .unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_invalid_inputs() {
        let planner = FilterLengthPlanner::new(22050.0);
        assert!(planner.clone().with_filter_scale(0.0).plan(&FREQS).is_err());
        assert!(planner.clone().with_gamma(-1.0).plan(&FREQS).is_err());
        assert!(planner.clone().with_alpha(vec![0.1]).plan(&FREQS).is_err());
        assert!(planner.plan(&[65.41, 32.70]).is_err());
        assert!(FilterLengthPlanner::new(22050.0).plan(&[0.0, 10.0]).is_err());
        assert!(FilterLengthPlanner::new(0.0).plan(&FREQS).is_err());
        assert!(FilterLengthPlanner::new(22050.0).plan(&[440.0]).is_err());
    }

    #[test]
    fn test_alpha_override_out_of_range() {
        let planner = FilterLengthPlanner::new(22050.0);
        for bad in [0.0, -0.5, f64::NAN, 1.0, f64::INFINITY] {
            let err = planner
                .clone()
                .with_alpha(vec![bad, 0.5])
                .plan(&[110.0, 220.0])
                .unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidInput(_)), "alpha {bad}: {err:?}");
        }
    }
}
