//! Frequency-domain filter-bank assembly for fast variable-Q convolution.
//!
//! The assembler takes prototype time-domain filters, grows the FFT length
//! if the hop requires it, rescales each filter by `length / n_fft`,
//! transforms every row to a one-sided spectrum, and sparsifies the result.
//!
//! # Example
//!
//! ```rust
//! use resona_analysis::filterbank::{FilterBankAssembler, vqt_filter_fft};
//! use resona_analysis::wavelet::WaveletParams;
//!
//! let params = WaveletParams::new(22050.0);
//! let assembler = FilterBankAssembler::new().with_hop_length(512).with_sparsity(0.0);
//! let bank = vqt_filter_fft(&[32.70, 65.41, 130.81], &params, &assembler).unwrap();
//!
//! assert_eq!(bank.num_filters(), 3);
//! assert_eq!(bank.num_bins(), bank.n_fft() / 2 + 1);
//! ```

use crate::error::{AnalysisError, Result};
use crate::fft::{Complex64, Fft, ForwardTransform};
use crate::math::min_fft_len_for_hop;
use crate::sparse::{PeakRelative, RowSparsifier, check_threshold, nonzero_count};
use crate::wavelet::{CosineWavelets, PrototypeFilterBank, WaveletGenerator, WaveletParams};
use rayon::prelude::*;

/// One-sided filter spectra ready for fast convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyDomainFilterBank {
    spectra: Vec<Vec<Complex64>>,
    n_fft: usize,
    lengths: Vec<f64>,
    norm: f64,
}

impl FrequencyDomainFilterBank {
    /// Filter spectra, `[filter][bin]` with `n_fft / 2 + 1` bins per row.
    pub fn spectra(&self) -> &[Vec<Complex64>] {
        &self.spectra
    }

    /// FFT length the spectra were computed at.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Analytic filter lengths from the prototype bank.
    ///
    /// These describe the time-domain filters, not the (possibly larger)
    /// transform length.
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Normalization the prototypes were built with.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Number of filters.
    pub fn num_filters(&self) -> usize {
        self.spectra.len()
    }

    /// Number of one-sided frequency bins per filter.
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Count of nonzero coefficients in each filter.
    pub fn nonzero_counts(&self) -> Vec<usize> {
        self.spectra.iter().map(|row| nonzero_count(row)).collect()
    }

    /// Filter a one-sided frame spectrum: one complex response per filter.
    ///
    /// Zeroed coefficients are skipped.
    pub fn response(&self, spectrum: &[Complex64]) -> Result<Vec<Complex64>> {
        if spectrum.len() != self.num_bins() {
            return Err(AnalysisError::invalid(format!(
                "spectrum has {} bins, filter bank expects {}",
                spectrum.len(),
                self.num_bins()
            )));
        }
        let zero = Complex64::new(0.0, 0.0);
        Ok(self
            .spectra
            .iter()
            .map(|row| {
                row.iter()
                    .zip(spectrum)
                    .filter(|(c, _)| **c != zero)
                    .map(|(c, x)| c * x)
                    .sum()
            })
            .collect())
    }
}

/// Turns prototype filters into a [`FrequencyDomainFilterBank`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBankAssembler {
    hop_length: Option<usize>,
    sparsity: f64,
    norm: f64,
}

impl FilterBankAssembler {
    /// No hop constraint, 1% sparsity, unit normalization.
    pub fn new() -> Self {
        Self {
            hop_length: None,
            sparsity: 0.01,
            norm: 1.0,
        }
    }

    /// Require an FFT length large enough for this hop.
    pub fn with_hop_length(mut self, hop_length: usize) -> Self {
        self.hop_length = Some(hop_length);
        self
    }

    /// Relative threshold below which coefficients are zeroed.
    pub fn with_sparsity(mut self, sparsity: f64) -> Self {
        self.sparsity = sparsity;
        self
    }

    /// Normalization recorded on the assembled bank.
    pub fn with_norm(mut self, norm: f64) -> Self {
        self.norm = norm;
        self
    }

    /// Hop constraint, if any.
    pub fn hop_length(&self) -> Option<usize> {
        self.hop_length
    }

    /// Sparsity threshold.
    pub fn sparsity(&self) -> f64 {
        self.sparsity
    }

    /// FFT length for a prototype bank with `taps` columns.
    pub fn fft_length(&self, taps: usize) -> Result<usize> {
        match self.hop_length {
            Some(0) => Err(AnalysisError::invalid("hop_length must be >= 1")),
            Some(hop) => Ok(taps.max(min_fft_len_for_hop(hop))),
            None => Ok(taps),
        }
    }

    /// Assemble the frequency-domain bank.
    ///
    /// The prototype taps are rescaled in place; the prototype must not be
    /// read concurrently.
    pub fn assemble<T, S>(
        &self,
        prototype: &mut PrototypeFilterBank,
        fft: &T,
        sparsifier: &S,
    ) -> Result<FrequencyDomainFilterBank>
    where
        T: ForwardTransform + ?Sized,
        S: RowSparsifier + ?Sized,
    {
        check_threshold(self.sparsity)?;
        let taps = prototype.tap_count()?;
        let n_fft = self.fft_length(taps)?;
        if n_fft != taps {
            tracing::debug!(taps, n_fft, hop_length = ?self.hop_length, "raised FFT length for hop");
        }

        let scale = n_fft as f64;
        for (row, &length) in prototype.taps.iter_mut().zip(&prototype.lengths) {
            let factor = length / scale;
            for x in row.iter_mut() {
                *x *= factor;
            }
        }

        let mut spectra: Vec<Vec<Complex64>> = prototype
            .taps
            .par_iter()
            .map(|row| fft.forward_one_sided(row, n_fft))
            .collect();

        sparsifier.sparsify_rows(&mut spectra, self.sparsity)?;

        Ok(FrequencyDomainFilterBank {
            spectra,
            n_fft,
            lengths: prototype.lengths.clone(),
            norm: self.norm,
        })
    }
}

impl Default for FilterBankAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a variable-Q filter bank with injected collaborators.
pub fn vqt_filter_fft_with<G, T, S>(
    freqs: &[f64],
    params: &WaveletParams,
    assembler: &FilterBankAssembler,
    generator: &G,
    fft: &T,
    sparsifier: &S,
) -> Result<FrequencyDomainFilterBank>
where
    G: WaveletGenerator + ?Sized,
    T: ForwardTransform + ?Sized,
    S: RowSparsifier + ?Sized,
{
    let mut prototype = generator.generate(freqs, params)?;
    assembler
        .with_norm(params.norm)
        .assemble(&mut prototype, fft, sparsifier)
}

/// Build a variable-Q filter bank from cosine wavelets, rustfft, and
/// peak-relative sparsification.
pub fn vqt_filter_fft(
    freqs: &[f64],
    params: &WaveletParams,
    assembler: &FilterBankAssembler,
) -> Result<FrequencyDomainFilterBank> {
    vqt_filter_fft_with(
        freqs,
        params,
        assembler,
        &CosineWavelets,
        &Fft::new(),
        &PeakRelative,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequencies::FrequencySet;
    use crate::window::Window;

    /// Naive DFT, used to check the assembler without rustfft.
    struct NaiveDft;

    impl ForwardTransform for NaiveDft {
        fn forward(&self, input: &[f64], n_fft: usize) -> Vec<Complex64> {
            (0..n_fft)
                .map(|k| {
                    input
                        .iter()
                        .take(n_fft)
                        .enumerate()
                        .map(|(n, &x)| {
                            let phase =
                                -2.0 * std::f64::consts::PI * (k * n) as f64 / n_fft as f64;
                            Complex64::new(x * phase.cos(), x * phase.sin())
                        })
                        .sum()
                })
                .collect()
        }
    }

    fn impulse_bank() -> PrototypeFilterBank {
        let mut a = vec![0.0; 8];
        a[0] = 1.0;
        let mut b = vec![0.0; 8];
        b[0] = 2.0;
        PrototypeFilterBank::new(vec![a, b], vec![4.0, 2.0])
    }

    #[test]
    fn test_renormalizes_by_length_over_fft_size() {
        let mut proto = impulse_bank();
        let bank = FilterBankAssembler::new()
            .with_sparsity(0.0)
            .assemble(&mut proto, &NaiveDft, &PeakRelative)
            .unwrap();

        assert_eq!(bank.n_fft(), 8);
        assert_eq!(bank.num_bins(), 5);
        // impulse * 4/8 -> flat spectrum of 0.5; 2 * 2/8 -> 0.5
        for row in bank.spectra() {
            assert_eq!(row.len(), 5);
            for c in row {
                assert!((c.re - 0.5).abs() < 1e-12 && c.im.abs() < 1e-12);
            }
        }
        assert!((proto.taps[0][0] - 0.5).abs() < 1e-12);
        assert_eq!(bank.lengths(), &[4.0, 2.0]);
    }

    #[test]
    fn test_hop_raises_fft_length() {
        let mut proto = impulse_bank();
        let bank = FilterBankAssembler::new()
            .with_hop_length(8)
            .with_sparsity(0.0)
            .assemble(&mut proto, &NaiveDft, &PeakRelative)
            .unwrap();

        assert_eq!(bank.n_fft(), 16);
        assert_eq!(bank.num_bins(), 9);
        // Prototype taps keep their original width
        assert_eq!(proto.taps[0].len(), 8);
        assert!((proto.taps[0][0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_small_hop_keeps_fft_length() {
        let assembler = FilterBankAssembler::new().with_hop_length(2);
        assert_eq!(assembler.fft_length(8).unwrap(), 8);
        assert!(FilterBankAssembler::new().with_hop_length(0).fft_length(8).is_err());
    }

    #[test]
    fn test_ragged_prototype_rejected() {
        let mut proto = PrototypeFilterBank::new(vec![vec![0.0; 8], vec![0.0; 4]], vec![1.0, 1.0]);
        let err = FilterBankAssembler::new()
            .assemble(&mut proto, &NaiveDft, &PeakRelative)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DimensionMismatch { row: 1, .. }));
    }

    #[test]
    fn test_negative_sparsity_rejected() {
        let mut proto = impulse_bank();
        assert!(FilterBankAssembler::new()
            .with_sparsity(-1.0)
            .assemble(&mut proto, &NaiveDft, &PeakRelative)
            .is_err());
    }

    #[test]
    fn test_rustfft_matches_naive_dft() {
        let params = WaveletParams::new(8000.0);
        let freqs = [200.0, 400.0, 800.0];
        let mut a = CosineWavelets.generate(&freqs, &params).unwrap();
        let mut b = a.clone();

        let assembler = FilterBankAssembler::new().with_sparsity(0.0);
        let fast = assembler.assemble(&mut a, &Fft::new(), &PeakRelative).unwrap();
        let slow = assembler.assemble(&mut b, &NaiveDft, &PeakRelative).unwrap();

        for (rf, rs) in fast.spectra().iter().zip(slow.spectra()) {
            for (x, y) in rf.iter().zip(rs) {
                assert!((x - y).norm() < 1e-9);
            }
        }
    }

    /// Semitone-spaced bank from 220 Hz, two octaves, no bandwidth offset.
    fn semitone_bank(sample_rate: f64) -> (Vec<f64>, FrequencyDomainFilterBank) {
        let freqs = FrequencySet::geometric(220.0, 24, 12).unwrap();
        let mut params = WaveletParams::new(sample_rate);
        params.gamma = Some(0.0);
        let bank =
            vqt_filter_fft(freqs.as_slice(), &params, &FilterBankAssembler::new()).unwrap();
        (freqs.as_slice().to_vec(), bank)
    }

    #[test]
    fn test_filter_peaks_near_center_frequency() {
        let sample_rate = 22050.0;
        let (freqs, bank) = semitone_bank(sample_rate);

        for (row, &f) in bank.spectra().iter().zip(&freqs) {
            let peak_bin = row
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
                .map(|(i, _)| i)
                .unwrap();
            let peak_freq = peak_bin as f64 * sample_rate / bank.n_fft() as f64;
            assert!(
                (peak_freq - f).abs() < f * 0.1,
                "peak {peak_freq} Hz should be near {f} Hz"
            );
        }
    }

    #[test]
    fn test_response_selects_matching_filter() {
        let sample_rate = 22050.0;
        let (_, bank) = semitone_bank(sample_rate);

        let n = bank.n_fft();
        let mut tone: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / sample_rate).sin())
            .collect();
        Window::Hann.apply(&mut tone, true);
        let spectrum = Fft::new().forward_one_sided(&tone, n);
        let response = bank.response(&spectrum).unwrap();

        // Index 12 is one octave above 220 Hz
        assert!(response[12].norm() > 10.0 * response[0].norm());
        assert!(response[12].norm() > 10.0 * response[23].norm());
        assert!(bank.response(&spectrum[1..]).is_err());
    }

    #[test]
    fn test_norm_recorded() {
        let mut params = WaveletParams::new(22050.0);
        params.norm = 2.0;
        let bank = vqt_filter_fft(&[110.0, 220.0], &params, &FilterBankAssembler::new()).unwrap();
        assert_eq!(bank.norm(), 2.0);
    }

    #[test]
    fn test_degenerate_alpha_rejected_before_assembly() {
        let mut params = WaveletParams::new(22050.0);
        params.alpha = Some(vec![0.0, 0.5]);
        let err = vqt_filter_fft(&[110.0, 220.0], &params, &FilterBankAssembler::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }
}
