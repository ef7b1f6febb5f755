//! STFT-based spectrogram generation
//!
//! [`Stft`] frames the signal (centered by default), applies the analysis
//! window, and transforms each frame. [`spectrogram`] reduces the complex
//! result to magnitudes raised to a power.

use crate::error::{AnalysisError, Result};
use crate::fft::{Complex64, Fft, ForwardTransform};
use crate::framing::{PadMode, PaddingStrategy, frame, frame_centered};
use crate::math::to_db;
use crate::util::{pad_center, valid_audio};
use crate::window::WindowSpec;
use rayon::prelude::*;

/// Spectrogram data structure
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// 2D data `[frequency_bin][time_frame]`
    pub data: Vec<Vec<f64>>,
    /// FFT size used
    pub n_fft: usize,
    /// Hop size between frames
    pub hop_length: usize,
    /// Sample rate
    pub sample_rate: f64,
    /// Exponent applied to magnitudes
    pub power: f64,
}

impl Spectrogram {
    /// Number of frequency bins (n_fft / 2 + 1)
    pub fn num_bins(&self) -> usize {
        self.data.len()
    }

    /// Number of time frames
    pub fn num_frames(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Get frequency in Hz for a given bin index
    pub fn bin_to_freq(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate / self.n_fft as f64
    }

    /// Get time in seconds for a given frame index
    ///
    /// For centered analysis this is the time of the frame's center.
    pub fn frame_to_time(&self, frame: usize) -> f64 {
        frame as f64 * self.hop_length as f64 / self.sample_rate
    }

    /// Get maximum frequency (Nyquist)
    pub fn max_frequency(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Get value at a specific frequency bin and frame
    ///
    /// Returns None if out of bounds
    pub fn get(&self, bin: usize, frame: usize) -> Option<f64> {
        self.data.get(bin).and_then(|row| row.get(frame)).copied()
    }

    /// Values across time for a specific frequency bin
    pub fn bin_over_time(&self, bin: usize) -> Option<&[f64]> {
        self.data.get(bin).map(Vec::as_slice)
    }

    /// Spectrum of a single frame
    pub fn frame_spectrum(&self, frame: usize) -> Option<Vec<f64>> {
        if frame >= self.num_frames() {
            return None;
        }
        Some(self.data.iter().map(|row| row[frame]).collect())
    }

    /// Find peak frequency at a given time frame
    pub fn peak_frequency(&self, frame: usize) -> Option<f64> {
        let spectrum = self.frame_spectrum(frame)?;
        let (peak_bin, _) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
        Some(self.bin_to_freq(peak_bin))
    }

    /// Convert to dB relative to unit magnitude, accounting for `power`
    ///
    /// A zero power carries no magnitude information and maps to 0 dB.
    pub fn to_db(&self) -> Spectrogram {
        let power = if self.power == 0.0 { 1.0 } else { self.power };
        let data = self
            .data
            .iter()
            .map(|row| row.iter().map(|&v| to_db(v) / power).collect())
            .collect();

        Spectrogram {
            data,
            ..self.clone()
        }
    }
}

/// Short-time Fourier transform settings.
///
/// # Example
/// ```rust
/// use resona_analysis::spectrogram::Stft;
///
/// let signal: Vec<f64> = (0..4096).map(|i| (i as f64 * 0.1).sin()).collect();
/// let stft = Stft::new(1024).with_hop_length(256);
/// let matrix = stft.process(&signal).unwrap();
///
/// assert_eq!(matrix.len(), 513); // bins
/// assert_eq!(matrix[0].len(), 17); // frames
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Stft {
    n_fft: usize,
    hop_length: Option<usize>,
    win_length: Option<usize>,
    window: WindowSpec,
    center: bool,
    pad_mode: PadMode,
    padding: PaddingStrategy,
}

impl Stft {
    /// Hann window, centered framing, zero padding.
    pub fn new(n_fft: usize) -> Self {
        Self {
            n_fft,
            hop_length: None,
            win_length: None,
            window: WindowSpec::default(),
            center: true,
            pad_mode: PadMode::Constant,
            padding: PaddingStrategy::Auto,
        }
    }

    /// Samples between frames (default `win_length / 4`).
    pub fn with_hop_length(mut self, hop_length: usize) -> Self {
        self.hop_length = Some(hop_length);
        self
    }

    /// Window length before centering in `n_fft` (default `n_fft`).
    pub fn with_win_length(mut self, win_length: usize) -> Self {
        self.win_length = Some(win_length);
        self
    }

    /// Analysis window.
    pub fn with_window(mut self, window: impl Into<WindowSpec>) -> Self {
        self.window = window.into();
        self
    }

    /// Center frames on `k * hop_length` by padding the signal.
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Padding mode for centered framing.
    pub fn with_pad_mode(mut self, pad_mode: PadMode) -> Self {
        self.pad_mode = pad_mode;
        self
    }

    /// Padding strategy for centered framing.
    pub fn with_padding_strategy(mut self, padding: PaddingStrategy) -> Self {
        self.padding = padding;
        self
    }

    /// FFT size.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Effective window length.
    pub fn win_length(&self) -> usize {
        self.win_length.unwrap_or(self.n_fft)
    }

    /// Effective hop length.
    pub fn hop_length(&self) -> usize {
        self.hop_length.unwrap_or((self.win_length() / 4).max(1))
    }

    /// Number of one-sided bins.
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Check every setting.
    pub fn validate(&self) -> Result<()> {
        if self.n_fft == 0 {
            return Err(AnalysisError::invalid("n_fft must be > 0"));
        }
        let win_length = self.win_length();
        if win_length == 0 || win_length > self.n_fft {
            return Err(AnalysisError::invalid(format!(
                "win_length must satisfy 0 < win_length <= n_fft ({}), got {win_length}",
                self.n_fft
            )));
        }
        if self.hop_length() < 1 {
            return Err(AnalysisError::invalid("hop_length must be >= 1"));
        }
        if self.center && !self.pad_mode.is_supported() {
            return Err(AnalysisError::UnsupportedPadMode(self.pad_mode.to_string()));
        }
        Ok(())
    }

    /// Window resolved at `win_length` and centered in `n_fft` samples.
    pub fn window_coefficients(&self) -> Result<Vec<f64>> {
        let window = self.window.resolve(self.win_length(), true)?;
        pad_center(&window, self.n_fft)
    }

    /// Complex STFT `[bin][frame]` using the built-in FFT.
    pub fn process(&self, signal: &[f64]) -> Result<Vec<Vec<Complex64>>> {
        self.process_with(signal, &Fft::new())
    }

    /// Complex STFT `[bin][frame]` with a caller-supplied transform.
    pub fn process_with<T>(&self, signal: &[f64], fft: &T) -> Result<Vec<Vec<Complex64>>>
    where
        T: ForwardTransform + ?Sized,
    {
        self.validate()?;
        valid_audio(signal)?;
        let window = self.window_coefficients()?;
        let hop = self.hop_length();

        let centered;
        let frames: Vec<&[f64]> = if self.center {
            centered = frame_centered(signal, self.n_fft, hop, self.padding)?;
            centered.iter().collect()
        } else {
            if signal.len() < self.n_fft {
                return Err(AnalysisError::invalid(format!(
                    "n_fft={} is too large for uncentered analysis of input signal of length={}",
                    self.n_fft,
                    signal.len()
                )));
            }
            frame(signal, self.n_fft, hop, false)?.iter().collect()
        };

        let columns: Vec<Vec<Complex64>> = frames
            .par_iter()
            .map(|samples| {
                let windowed: Vec<f64> = samples.iter().zip(&window).map(|(x, w)| x * w).collect();
                fft.forward_one_sided(&windowed, self.n_fft)
            })
            .collect();

        tracing::debug!(
            n_fft = self.n_fft,
            hop_length = hop,
            n_frames = columns.len(),
            "computed stft"
        );

        Ok(transpose(&columns, self.num_bins()))
    }

    /// Magnitude spectrogram raised to `power`.
    ///
    /// Any finite exponent is accepted; exponents other than 1 and 2 go
    /// through `powf`.
    pub fn spectrogram(&self, signal: &[f64], power: f64, sample_rate: f64) -> Result<Spectrogram> {
        if !power.is_finite() {
            return Err(AnalysisError::invalid(format!(
                "power must be finite, got {power}"
            )));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "sample_rate must be positive, got {sample_rate}"
            )));
        }
        let stft = self.process(signal)?;
        let data = stft
            .iter()
            .map(|row| row.iter().map(|c| raise(c.norm(), power)).collect())
            .collect();

        Ok(Spectrogram {
            data,
            n_fft: self.n_fft,
            hop_length: self.hop_length(),
            sample_rate,
            power,
        })
    }
}

/// Centered Hann-window spectrogram: `|STFT|^power`, `[bin][frame]`.
///
/// `power = 1` gives magnitude, `power = 2` gives power.
pub fn spectrogram(
    signal: &[f64],
    n_fft: usize,
    hop_length: usize,
    power: f64,
    sample_rate: f64,
) -> Result<Spectrogram> {
    Stft::new(n_fft)
        .with_hop_length(hop_length)
        .spectrogram(signal, power, sample_rate)
}

fn raise(magnitude: f64, power: f64) -> f64 {
    if power == 1.0 {
        magnitude
    } else if power == 2.0 {
        magnitude * magnitude
    } else {
        magnitude.powf(power)
    }
}

fn transpose(columns: &[Vec<Complex64>], num_bins: usize) -> Vec<Vec<Complex64>> {
    (0..num_bins)
        .map(|bin| columns.iter().map(|col| col[bin]).collect())
        .collect()
}
