//! Prototype time-domain filter banks.
//!
//! The assembler consumes prototypes through [`WaveletGenerator`] so that any
//! generator can be plugged in. [`CosineWavelets`] is the reference
//! generator: one windowed, normalized cosine per center frequency, centered
//! in a common power-of-two support.

use crate::error::{AnalysisError, Result};
use crate::lengths::{FilterLengthPlanner, FilterPlan};
use crate::util::pad_center;
use crate::window::WindowSpec;
use std::f64::consts::PI;

/// Real time-domain filter taps (one row per filter) plus the analytic
/// length of each filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeFilterBank {
    /// Filter taps, `[filter][sample]`.
    pub taps: Vec<Vec<f64>>,
    /// Analytic length of each filter, in samples.
    pub lengths: Vec<f64>,
}

impl PrototypeFilterBank {
    /// Wrap taps and lengths without validation.
    pub fn new(taps: Vec<Vec<f64>>, lengths: Vec<f64>) -> Self {
        Self { taps, lengths }
    }

    /// Number of filters.
    pub fn num_filters(&self) -> usize {
        self.taps.len()
    }

    /// Common tap count of every row.
    ///
    /// Fails with [`AnalysisError::DimensionMismatch`] on ragged rows and
    /// [`AnalysisError::InvalidInput`] when the bank is empty or the length
    /// vector does not match the rows.
    pub fn tap_count(&self) -> Result<usize> {
        let Some(first) = self.taps.first() else {
            return Err(AnalysisError::invalid("prototype filter bank is empty"));
        };
        let expected = first.len();
        if let Some((row, taps)) = self
            .taps
            .iter()
            .enumerate()
            .find(|(_, taps)| taps.len() != expected)
        {
            return Err(AnalysisError::DimensionMismatch {
                row,
                expected,
                actual: taps.len(),
            });
        }
        if self.lengths.len() != self.taps.len() {
            return Err(AnalysisError::invalid(format!(
                "{} lengths for {} filters",
                self.lengths.len(),
                self.taps.len()
            )));
        }
        Ok(expected)
    }
}

/// Settings handed to a [`WaveletGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletParams {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Scale of filter windows; smaller values give shorter filters.
    pub filter_scale: f64,
    /// p-norm used to normalize each filter (`f64::INFINITY` for peak).
    pub norm: f64,
    /// Center-pad every filter to the next power of two.
    pub pad_fft: bool,
    /// Window applied to each filter.
    pub window: WindowSpec,
    /// Explicit bandwidth offset; derived from alpha when `None`.
    pub gamma: Option<f64>,
    /// Explicit relative bandwidths; estimated when `None`.
    pub alpha: Option<Vec<f64>>,
}

impl WaveletParams {
    /// Hann window, unit scale, L1 norm, power-of-two padding.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            filter_scale: 1.0,
            norm: 1.0,
            pad_fft: true,
            window: WindowSpec::default(),
            gamma: None,
            alpha: None,
        }
    }

    /// Length planner matching these settings.
    pub fn planner(&self) -> FilterLengthPlanner {
        let mut planner = FilterLengthPlanner::new(self.sample_rate)
            .with_window(self.window.family_name().unwrap_or_default())
            .with_filter_scale(self.filter_scale);
        if let Some(g) = self.gamma {
            planner = planner.with_gamma(g);
        }
        if let Some(alpha) = &self.alpha {
            planner = planner.with_alpha(alpha.clone());
        }
        planner
    }
}

/// Produces a prototype filter bank for a set of center frequencies.
pub trait WaveletGenerator: Sync {
    /// Build one row of taps per frequency, all rows the same length.
    fn generate(&self, freqs: &[f64], params: &WaveletParams) -> Result<PrototypeFilterBank>;
}

/// Windowed cosines at each center frequency, normalized and centered.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineWavelets;

impl CosineWavelets {
    fn filter(freq: f64, length: f64, params: &WaveletParams) -> Result<Vec<f64>> {
        let n = (length.ceil() as usize).max(1);
        let half = (n / 2) as f64;
        let window = params.window.resolve(n, true)?;

        let mut taps: Vec<f64> = window
            .iter()
            .enumerate()
            .map(|(j, w)| {
                let t = j as f64 - half;
                w * (2.0 * PI * freq * t / params.sample_rate).cos()
            })
            .collect();

        let scale = p_norm(&taps, params.norm);
        if scale > 1e-10 {
            for x in &mut taps {
                *x /= scale;
            }
        }
        Ok(taps)
    }
}

impl WaveletGenerator for CosineWavelets {
    fn generate(&self, freqs: &[f64], params: &WaveletParams) -> Result<PrototypeFilterBank> {
        if params.norm.is_nan() || params.norm <= 0.0 {
            return Err(AnalysisError::invalid(format!(
                "norm must be positive, got {}",
                params.norm
            )));
        }
        let FilterPlan { lengths, .. } = params.planner().plan(freqs)?;

        let filters = freqs
            .iter()
            .zip(&lengths)
            .map(|(&f, &len)| Self::filter(f, len, params))
            .collect::<Result<Vec<_>>>()?;

        let longest = filters.iter().map(Vec::len).max().unwrap_or(1);
        let support = if params.pad_fft {
            longest.next_power_of_two()
        } else {
            longest
        };

        let taps = filters
            .iter()
            .map(|f| pad_center(f, support))
            .collect::<Result<Vec<_>>>()?;

        Ok(PrototypeFilterBank::new(taps, lengths))
    }
}

/// p-norm of a buffer; `p = inf` gives the peak magnitude.
fn p_norm(data: &[f64], p: f64) -> f64 {
    if p.is_infinite() {
        data.iter().map(|x| x.abs()).fold(0.0, f64::max)
    } else {
        data.iter().map(|x| x.abs().powf(p)).sum::<f64>().powf(1.0 / p)
    }
}
