//! Configuration and preset management for resona analysis.
//!
//! Presets are TOML files describing a variable-Q filter bank (`[filters]`)
//! and a spectrogram (`[spectrogram]`). A preset validates its settings and
//! builds the corresponding `resona-analysis` objects.
//!
//! # Features
//!
//! - **Preset System**: Load and save analysis presets from TOML files
//! - **Validation**: Range checks plus a Nyquist check on the filter bank
//! - **Builders**: Filter plans, filter banks, STFTs and spectrograms
//! - **Factory Presets**: Built-in VQT, CQT and speech settings
//!
//! # Example
//!
//! ```rust,no_run
//! use resona_config::{AnalysisPreset, get_factory_preset};
//!
//! let preset = AnalysisPreset::load("piano.toml").unwrap();
//! preset.validate().unwrap();
//! let bank = preset.filter_bank().unwrap();
//!
//! let speech = get_factory_preset("speech").unwrap();
//! speech.save("presets/speech.toml").unwrap();
//! ```

mod error;
mod preset;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use preset::{AnalysisPreset, FilterSettings, SpectrogramSettings};
