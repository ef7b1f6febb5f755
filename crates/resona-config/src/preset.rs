//! Analysis preset file format and operations.

use resona_analysis::{
    FilterBankAssembler, FilterPlan, FrequencyDomainFilterBank, FrequencySet, PadMode,
    Spectrogram, Stft, WaveletParams, WindowSpec, vqt_filter_fft,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Filter-bank settings (`[filters]` table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterSettings {
    /// Lowest center frequency in Hz.
    pub fmin: f64,
    /// Number of filters.
    pub n_bins: usize,
    /// Filters per octave.
    pub bins_per_octave: usize,
    /// Scale of filter windows.
    pub filter_scale: f64,
    /// Bandwidth offset; derived from the relative bandwidth when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    /// Window applied to each filter.
    pub window: WindowSpec,
    /// p-norm used to normalize each filter.
    pub norm: f64,
    /// Relative threshold below which spectral coefficients are zeroed.
    pub sparsity: f64,
    /// Hop the filter bank must support, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_length: Option<usize>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            fmin: 32.70,
            n_bins: 84,
            bins_per_octave: 12,
            filter_scale: 1.0,
            gamma: None,
            window: WindowSpec::default(),
            norm: 1.0,
            sparsity: 0.01,
            hop_length: Some(512),
        }
    }
}

/// Spectrogram settings (`[spectrogram]` table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpectrogramSettings {
    /// FFT size.
    pub n_fft: usize,
    /// Samples between frames; `win_length / 4` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_length: Option<usize>,
    /// Window length; `n_fft` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_length: Option<usize>,
    /// Analysis window.
    pub window: WindowSpec,
    /// Center frames on multiples of the hop.
    pub center: bool,
    /// Boundary padding for centered frames.
    pub pad_mode: PadMode,
    /// Exponent applied to magnitudes.
    pub power: f64,
}

impl Default for SpectrogramSettings {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: None,
            win_length: None,
            window: WindowSpec::default(),
            center: true,
            pad_mode: PadMode::Constant,
            power: 2.0,
        }
    }
}

/// Preset file format for analysis settings.
///
/// # TOML Format
///
/// ```toml
/// name = "Piano VQT"
/// description = "Seven octaves from C1"
/// sample_rate = 22050.0
///
/// [filters]
/// fmin = 32.70
/// n_bins = 84
/// bins_per_octave = 12
/// window = "hann"
/// sparsity = 0.01
/// hop_length = 512
///
/// [spectrogram]
/// n_fft = 2048
/// window = ["kaiser", 14.0]
/// pad_mode = "constant"
/// power = 2.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate of the audio the preset is meant for (defaults to 22050).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Filter-bank settings.
    #[serde(default)]
    pub filters: FilterSettings,

    /// Spectrogram settings.
    #[serde(default)]
    pub spectrogram: SpectrogramSettings,
}

fn default_sample_rate() -> f64 {
    22050.0
}

impl AnalysisPreset {
    /// Create a preset with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            filters: FilterSettings::default(),
            spectrogram: SpectrogramSettings::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace the filter-bank settings.
    pub fn with_filters(mut self, filters: FilterSettings) -> Self {
        self.filters = filters;
        self
    }

    /// Replace the spectrogram settings.
    pub fn with_spectrogram(mut self, spectrogram: SpectrogramSettings) -> Self {
        self.spectrogram = spectrogram;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: AnalysisPreset = toml::from_str(&content)?;
        tracing::debug!(name = %preset.name, path = %path.display(), "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(name = %self.name, path = %path.display(), "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every setting, including that the filter bank stays below Nyquist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::invalid_setting(
                "preset",
                "sample_rate",
                format!("must be positive, got {}", self.sample_rate),
            ));
        }

        let f = &self.filters;
        if f.n_bins < 2 {
            return Err(ConfigError::invalid_setting(
                "filters",
                "n_bins",
                format!("must be at least 2, got {}", f.n_bins),
            ));
        }
        if f.bins_per_octave == 0 {
            return Err(ConfigError::invalid_setting(
                "filters",
                "bins_per_octave",
                "must be at least 1",
            ));
        }
        if !(f.sparsity.is_finite() && f.sparsity >= 0.0) {
            return Err(ConfigError::invalid_setting(
                "filters",
                "sparsity",
                format!("must be non-negative, got {}", f.sparsity),
            ));
        }
        if f.norm.is_nan() || f.norm <= 0.0 {
            return Err(ConfigError::invalid_setting(
                "filters",
                "norm",
                format!("must be positive, got {}", f.norm),
            ));
        }
        if f.hop_length == Some(0) {
            return Err(ConfigError::invalid_setting(
                "filters",
                "hop_length",
                "must be at least 1",
            ));
        }
        if matches!(f.window, WindowSpec::Coefficients(_)) {
            return Err(ConfigError::invalid_setting(
                "filters",
                "window",
                "must name a window family; filters differ in length",
            ));
        }
        f.window.window()?;

        let plan = self.filter_plan()?;
        let nyquist = self.sample_rate / 2.0;
        if plan.f_cutoff > nyquist {
            return Err(ConfigError::invalid_setting(
                "filters",
                "n_bins",
                format!(
                    "filter bank reaches {:.2} Hz, above Nyquist ({nyquist:.2} Hz)",
                    plan.f_cutoff
                ),
            ));
        }

        let s = &self.spectrogram;
        if !s.power.is_finite() {
            return Err(ConfigError::invalid_setting(
                "spectrogram",
                "power",
                format!("must be finite, got {}", s.power),
            ));
        }
        self.stft().validate()?;
        Ok(())
    }

    /// Center frequencies described by the `[filters]` table.
    pub fn frequencies(&self) -> Result<FrequencySet, ConfigError> {
        let f = &self.filters;
        Ok(FrequencySet::geometric(f.fmin, f.n_bins, f.bins_per_octave)?)
    }

    /// Wavelet settings for the filter bank.
    pub fn wavelet_params(&self) -> WaveletParams {
        let f = &self.filters;
        WaveletParams {
            filter_scale: f.filter_scale,
            norm: f.norm,
            window: f.window.clone(),
            gamma: f.gamma,
            ..WaveletParams::new(self.sample_rate)
        }
    }

    /// Assembler configured with the preset's hop and sparsity.
    pub fn assembler(&self) -> FilterBankAssembler {
        let assembler = FilterBankAssembler::new()
            .with_sparsity(self.filters.sparsity)
            .with_norm(self.filters.norm);
        match self.filters.hop_length {
            Some(hop) => assembler.with_hop_length(hop),
            None => assembler,
        }
    }

    /// Per-filter lengths and cutoff.
    pub fn filter_plan(&self) -> Result<FilterPlan, ConfigError> {
        let freqs = self.frequencies()?;
        Ok(self.wavelet_params().planner().plan(freqs.as_slice())?)
    }

    /// Build the frequency-domain filter bank.
    pub fn filter_bank(&self) -> Result<FrequencyDomainFilterBank, ConfigError> {
        let freqs = self.frequencies()?;
        Ok(vqt_filter_fft(
            freqs.as_slice(),
            &self.wavelet_params(),
            &self.assembler(),
        )?)
    }

    /// STFT configured by the `[spectrogram]` table.
    pub fn stft(&self) -> Stft {
        let s = &self.spectrogram;
        let mut stft = Stft::new(s.n_fft)
            .with_window(s.window.clone())
            .with_center(s.center)
            .with_pad_mode(s.pad_mode);
        if let Some(hop) = s.hop_length {
            stft = stft.with_hop_length(hop);
        }
        if let Some(win) = s.win_length {
            stft = stft.with_win_length(win);
        }
        stft
    }

    /// Spectrogram of `signal` with the preset's settings.
    pub fn spectrogram(&self, signal: &[f64]) -> Result<Spectrogram, ConfigError> {
        Ok(self
            .stft()
            .spectrogram(signal, self.spectrogram.power, self.sample_rate)?)
    }
}

impl Default for AnalysisPreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
