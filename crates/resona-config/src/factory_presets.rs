//! Factory presets bundled with the resona library.
//!
//! Built-in analysis settings that are always available without external
//! files.

use crate::AnalysisPreset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["vqt", "cqt", "speech"];

/// TOML content for factory presets.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("vqt", VQT_PRESET),
    ("cqt", CQT_PRESET),
    ("speech", SPEECH_PRESET),
];

/// Seven octaves of semitone filters with ERB-like low-frequency widening.
const VQT_PRESET: &str = r#"
name = "VQT"
description = "Seven octaves from C1, semitone resolution, derived gamma"
sample_rate = 22050.0

[filters]
fmin = 32.70
n_bins = 84
bins_per_octave = 12
window = "hann"
sparsity = 0.01
hop_length = 512

[spectrogram]
n_fft = 2048
hop_length = 512
power = 2.0
"#;

/// Constant-Q: zero bandwidth offset.
const CQT_PRESET: &str = r#"
name = "CQT"
description = "Constant-Q filter bank, no bandwidth offset"
sample_rate = 22050.0

[filters]
fmin = 32.70
n_bins = 84
bins_per_octave = 12
gamma = 0.0
window = "hann"
sparsity = 0.01
hop_length = 512

[spectrogram]
n_fft = 4096
hop_length = 512
window = ["kaiser", 8.6]
power = 1.0
"#;

/// 16 kHz speech analysis with 25 ms windows and 10 ms hops.
const SPEECH_PRESET: &str = r#"
name = "Speech"
description = "Five octaves from C2 at 16 kHz, 25 ms Hamming frames"
sample_rate = 16000.0

[filters]
fmin = 65.41
n_bins = 60
bins_per_octave = 12
window = "hamming"
sparsity = 0.01
hop_length = 160

[spectrogram]
n_fft = 512
hop_length = 160
win_length = 400
window = "hamming"
power = 1.0
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use resona_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("  - {}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<AnalysisPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| AnalysisPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by internal or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use resona_config::get_factory_preset;
///
/// let preset = get_factory_preset("cqt").unwrap();
/// assert_eq!(preset.filters.gamma, Some(0.0));
/// ```
pub fn get_factory_preset(name: &str) -> Option<AnalysisPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(id, toml)| Some((*id, AnalysisPreset::from_toml(toml).ok()?)))
        .find(|(id, preset)| id.eq_ignore_ascii_case(name) || preset.name.eq_ignore_ascii_case(name))
        .map(|(_, preset)| preset)
}

/// Get the names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a preset name is a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
