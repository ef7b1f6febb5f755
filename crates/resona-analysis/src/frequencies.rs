//! Validated center-frequency sets.

use crate::error::{AnalysisError, Result};

/// Strictly increasing, strictly positive, finite center frequencies in Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySet {
    freqs: Vec<f64>,
}

impl FrequencySet {
    /// Validate and wrap a list of center frequencies.
    pub fn new(freqs: impl Into<Vec<f64>>) -> Result<Self> {
        let freqs = freqs.into();
        if freqs.is_empty() {
            return Err(AnalysisError::invalid("frequency set must not be empty"));
        }
        if let Some(f) = freqs.iter().find(|f| !f.is_finite() || **f <= 0.0) {
            return Err(AnalysisError::invalid(format!(
                "frequencies must be strictly positive and finite, got {f}"
            )));
        }
        if let Some(w) = freqs.windows(2).find(|w| w[0] >= w[1]) {
            return Err(AnalysisError::invalid(format!(
                "frequencies must be strictly ascending ({} >= {})",
                w[0], w[1]
            )));
        }
        Ok(Self { freqs })
    }

    /// Geometrically spaced frequencies: `fmin * 2^(k / bins_per_octave)`.
    ///
    /// # Example
    /// ```rust
    /// use resona_analysis::FrequencySet;
    ///
    /// let freqs = FrequencySet::geometric(55.0, 25, 12).unwrap();
    /// assert_eq!(freqs.len(), 25);
    /// assert!((freqs.as_slice()[12] - 110.0).abs() < 1e-9);
    /// ```
    pub fn geometric(fmin: f64, n_bins: usize, bins_per_octave: usize) -> Result<Self> {
        if bins_per_octave == 0 {
            return Err(AnalysisError::invalid("bins_per_octave must be positive"));
        }
        let freqs: Vec<f64> = (0..n_bins)
            .map(|k| fmin * 2.0_f64.powf(k as f64 / bins_per_octave as f64))
            .collect();
        Self::new(freqs)
    }

    /// Number of frequencies.
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    /// Always false; an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    /// Frequencies as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.freqs
    }

    /// Lowest frequency.
    pub fn min(&self) -> f64 {
        self.freqs[0]
    }

    /// Highest frequency.
    pub fn max(&self) -> f64 {
        self.freqs[self.freqs.len() - 1]
    }

    /// Scale every frequency by a positive constant.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        Self::new(self.freqs.iter().map(|f| f * factor).collect::<Vec<_>>())
    }
}

impl AsRef<[f64]> for FrequencySet {
    fn as_ref(&self) -> &[f64] {
        &self.freqs
    }
}
