//! Row-wise sparsification of complex filter matrices.

use crate::error::{AnalysisError, Result};
use crate::fft::Complex64;
use rayon::prelude::*;

/// Zeroes small coefficients of each row of a complex matrix.
pub trait RowSparsifier: Sync {
    /// Sparsify every row in place with the given relative threshold.
    fn sparsify_rows(&self, rows: &mut [Vec<Complex64>], threshold: f64) -> Result<()>;
}

/// Zeroes entries whose magnitude is below `threshold * peak`, where `peak`
/// is the largest magnitude of the entry's own row.
///
/// A threshold of 0 leaves every row untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakRelative;

impl PeakRelative {
    fn sparsify_row(row: &mut [Complex64], threshold: f64) {
        let peak = row.iter().map(|c| c.norm()).fold(0.0, f64::max);
        let floor = threshold * peak;
        for c in row.iter_mut() {
            if c.norm() < floor {
                *c = Complex64::new(0.0, 0.0);
            }
        }
    }
}

impl RowSparsifier for PeakRelative {
    fn sparsify_rows(&self, rows: &mut [Vec<Complex64>], threshold: f64) -> Result<()> {
        check_threshold(threshold)?;
        if threshold == 0.0 {
            return Ok(());
        }
        rows.par_iter_mut()
            .for_each(|row| Self::sparsify_row(row, threshold));
        Ok(())
    }
}

/// Sparsity thresholds must be finite and non-negative.
pub fn check_threshold(threshold: f64) -> Result<()> {
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(AnalysisError::invalid(format!(
            "sparsity must be non-negative, got {threshold}"
        )));
    }
    Ok(())
}

/// Count of nonzero entries in a row.
pub fn nonzero_count(row: &[Complex64]) -> usize {
    row.iter().filter(|c| c.re != 0.0 || c.im != 0.0).count()
}
