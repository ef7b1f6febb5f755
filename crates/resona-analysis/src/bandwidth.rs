//! Relative bandwidth estimation from center-frequency spacing.
//!
//! Local spacing is measured in log2 frequency: one-sided differences at the
//! two boundary filters, centered differences in between. The spacing gives a
//! local bins-per-octave figure, which converts to a relative bandwidth
//!
//! ```text
//! alpha = (2^(2/bpo) - 1) / (2^(2/bpo) + 1)
//! ```
//!
//! Only log-differences enter, so `alpha` is unchanged when every frequency is
//! multiplied by the same constant.

use crate::error::{AnalysisError, Result};
use crate::frequencies::FrequencySet;

/// Relative bandwidth per filter, plus the local bins-per-octave it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthProfile {
    /// Relative bandwidth of each filter, in (0, 1) for realistic inputs.
    pub alpha: Vec<f64>,
    /// Local bins-per-octave estimate of each filter.
    pub bins_per_octave: Vec<f64>,
}

impl BandwidthProfile {
    /// Number of filters.
    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    /// True when the profile holds no filters.
    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }
}

/// Estimate the relative bandwidth of each filter from ascending center frequencies.
///
/// Fails with [`AnalysisError::InvalidInput`] when fewer than two frequencies
/// are supplied, or when they are not strictly positive and ascending.
///
/// # Example
/// ```rust
/// use resona_analysis::bandwidth::relative_bandwidth;
///
/// let profile = relative_bandwidth(&[55.0, 110.0, 220.0, 440.0]).unwrap();
/// // One octave spacing everywhere: alpha = (4 - 1) / (4 + 1)
/// assert!(profile.alpha.iter().all(|a| (a - 0.6).abs() < 1e-12));
/// ```
pub fn relative_bandwidth(freqs: &[f64]) -> Result<BandwidthProfile> {
    let n = freqs.len();
    if n < 2 {
        return Err(AnalysisError::invalid(format!(
            "2 or more frequencies are required to compute bandwidths, got {n}"
        )));
    }
    let freqs = FrequencySet::new(freqs.to_vec())?;

    let logf: Vec<f64> = freqs.as_slice().iter().map(|f| f.log2()).collect();

    let mut bpo = vec![0.0; n];
    bpo[0] = 1.0 / (logf[1] - logf[0]);
    bpo[n - 1] = 1.0 / (logf[n - 1] - logf[n - 2]);
    for i in 1..n - 1 {
        bpo[i] = 2.0 / (logf[i + 1] - logf[i - 1]);
    }

    let alpha = bpo
        .iter()
        .map(|&b| {
            let ratio = 2.0_f64.powf(2.0 / b);
            (ratio - 1.0) / (ratio + 1.0)
        })
        .collect();

    Ok(BandwidthProfile {
        alpha,
        bins_per_octave: bpo,
    })
}
