//! Resona Analysis - Variable-Q filter banks and framed spectral transforms
//!
//! This crate provides the numeric core of a variable-Q / constant-Q
//! analysis pipeline:
//!
//! - [`bandwidth`] - Relative bandwidth of each filter from frequency spacing
//! - [`lengths`] - Per-filter time-domain lengths and the bank's cutoff frequency
//! - [`window`] - Hann, Hamming and Kaiser windows, plus window specs
//! - [`wavelet`] - Prototype time-domain filters and the generator capability
//! - [`filterbank`] - Frequency-domain filter-bank assembly for fast convolution
//! - [`framing`] - Overlapping frames, including centered partial padding
//! - [`spectrogram`] - STFT and magnitude/power spectrograms
//! - [`fft`] - Forward FFT capability backed by rustfft
//! - [`sparse`] - Row-wise sparsification of filter spectra
//!
//! Sample data is `f64` throughout. Errors are reported through
//! [`AnalysisError`]; the one non-fatal condition (a signal shorter than
//! `n_fft` under centered framing) is emitted as a `tracing` warning.
//!
//! ## Filter Bank
//!
//! ```rust
//! use resona_analysis::{FilterBankAssembler, FrequencySet, WaveletParams, vqt_filter_fft};
//!
//! let freqs = FrequencySet::geometric(55.0, 36, 12).unwrap();
//! let params = WaveletParams::new(22050.0);
//! let assembler = FilterBankAssembler::new().with_hop_length(512);
//! let bank = vqt_filter_fft(freqs.as_slice(), &params, &assembler).unwrap();
//!
//! assert_eq!(bank.num_filters(), 36);
//! assert!(bank.n_fft() >= 1024);
//! ```
//!
//! ## Spectrogram
//!
//! ```rust
//! use resona_analysis::spectrogram;
//!
//! let signal: Vec<f64> = (0..22050)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 22050.0).sin())
//!     .collect();
//! let spec = spectrogram(&signal, 2048, 512, 2.0, 22050.0).unwrap();
//!
//! let peak = spec.peak_frequency(spec.num_frames() / 2).unwrap();
//! assert!((peak - 440.0).abs() < 20.0);
//! ```

pub mod bandwidth;
pub mod error;
pub mod fft;
pub mod filterbank;
pub mod framing;
pub mod frequencies;
pub mod lengths;
pub mod math;
pub mod sparse;
pub mod spectrogram;
pub mod util;
pub mod wavelet;
pub mod window;

// Re-export main types
pub use bandwidth::{BandwidthProfile, relative_bandwidth};
pub use error::{AnalysisError, Result};
pub use fft::{Complex64, Fft, ForwardTransform};
pub use filterbank::{FilterBankAssembler, FrequencyDomainFilterBank, vqt_filter_fft, vqt_filter_fft_with};
pub use framing::{CenteredFrames, FrameView, PadMode, PaddingStrategy, frame, frame_centered, frame_channels};
pub use frequencies::FrequencySet;
pub use lengths::{FilterLengthPlanner, FilterPlan, wavelet_lengths, window_bandwidth};
pub use sparse::{PeakRelative, RowSparsifier};
pub use spectrogram::{Spectrogram, Stft, spectrogram};
pub use util::{pad_center, pad_constant, valid_audio};
pub use wavelet::{CosineWavelets, PrototypeFilterBank, WaveletGenerator, WaveletParams};
pub use window::{Window, WindowSpec};
