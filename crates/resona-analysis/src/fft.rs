//! Forward FFT capability and its rustfft-backed implementation.

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::{Arc, Mutex};

/// Complex sample type used for spectra.
pub type Complex64 = Complex<f64>;

/// A forward discrete Fourier transform of real input.
///
/// The input is zero-padded or truncated to `n_fft`; the full (two-sided)
/// spectrum of length `n_fft` is returned. Implementations must be shareable
/// across threads since rows and frames are transformed in parallel.
pub trait ForwardTransform: Sync {
    /// Transform `input` at length `n_fft`.
    fn forward(&self, input: &[f64], n_fft: usize) -> Vec<Complex64>;

    /// Transform and keep only bins `0..=n_fft / 2`.
    fn forward_one_sided(&self, input: &[f64], n_fft: usize) -> Vec<Complex64> {
        let mut spectrum = self.forward(input, n_fft);
        spectrum.truncate(n_fft / 2 + 1);
        spectrum
    }
}

/// FFT processor with caching
///
/// The planner keeps one plan per length; plans are shared between threads.
pub struct Fft {
    planner: Mutex<FftPlanner<f64>>,
}

impl Fft {
    /// Create a new FFT processor
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
        }
    }

    /// Forward plan for a length
    fn plan(&self, n_fft: usize) -> Arc<dyn rustfft::Fft<f64>> {
        let mut planner = self.planner.lock().unwrap_or_else(|e| e.into_inner());
        planner.plan_fft_forward(n_fft)
    }
}

impl Default for Fft {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft").finish_non_exhaustive()
    }
}

impl ForwardTransform for Fft {
    fn forward(&self, input: &[f64], n_fft: usize) -> Vec<Complex64> {
        if n_fft == 0 {
            return Vec::new();
        }
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(n_fft)
            .map(|&x| Complex::new(x, 0.0))
            .collect();

        // Pad to FFT size
        buffer.resize(n_fft, Complex::new(0.0, 0.0));

        self.plan(n_fft).process(&mut buffer);
        buffer
    }
}

/// Magnitude of each bin
pub fn magnitudes(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm()).collect()
}
