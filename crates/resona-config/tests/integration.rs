//! Integration tests for resona-config.
//!
//! These tests verify end-to-end functionality across modules.

use resona_analysis::{PadMode, WindowSpec};
use resona_config::{
    AnalysisPreset, ConfigError, FilterSettings, SpectrogramSettings, factory_presets,
    get_factory_preset,
};
use tempfile::TempDir;

/// Save to disk, load back, and compare.
#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("piano.toml");

    let preset = AnalysisPreset::new("Piano")
        .with_description("Piano range, kaiser spectrogram")
        .with_sample_rate(44100.0)
        .with_filters(FilterSettings {
            fmin: 27.5,
            n_bins: 88,
            gamma: Some(0.0),
            ..FilterSettings::default()
        })
        .with_spectrogram(SpectrogramSettings {
            n_fft: 4096,
            hop_length: Some(1024),
            window: WindowSpec::Parameterized("kaiser".to_string(), 14.0),
            power: 1.0,
            ..SpectrogramSettings::default()
        });

    preset.save(&path).expect("save should create parent dirs");
    assert!(path.exists());

    let loaded = AnalysisPreset::load(&path).expect("load");
    assert_eq!(loaded, preset);
    loaded.validate().expect("piano preset is valid");
}

/// Missing files surface as ReadFile errors with the path.
#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("missing.toml");
    let err = AnalysisPreset::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { ref path, .. } if path.ends_with("missing.toml")));
}

/// Malformed TOML on disk surfaces as a parse error.
#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "name = ").expect("write");
    assert!(matches!(
        AnalysisPreset::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

/// A preset drives the full filter-bank pipeline.
#[test]
fn test_preset_builds_filter_bank() {
    let preset = get_factory_preset("vqt").expect("vqt preset should exist");
    let plan = preset.filter_plan().expect("plan");
    let bank = preset.filter_bank().expect("bank");

    assert_eq!(bank.num_filters(), 84);
    assert_eq!(bank.lengths(), plan.lengths.as_slice());
    assert!(bank.n_fft() >= 1024);
    assert!(bank.nonzero_counts().iter().all(|&c| c > 0));
}

/// A preset drives the spectrogram pipeline.
#[test]
fn test_preset_builds_spectrogram() {
    let preset = get_factory_preset("speech").expect("speech preset should exist");
    let sample_rate = preset.sample_rate;
    let signal: Vec<f64> = (0..16000)
        .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / sample_rate).sin())
        .collect();

    let spec = preset.spectrogram(&signal).expect("spectrogram");
    assert_eq!(spec.num_bins(), 257);
    assert_eq!(spec.num_frames(), 1 + 16000 / 160);

    let peak = spec.peak_frequency(spec.num_frames() / 2).unwrap();
    assert!((peak - 1000.0).abs() < 40.0, "peak at {peak} Hz");
}

/// Rejected pad modes flow through as analysis errors.
#[test]
fn test_unsupported_pad_mode_from_preset() {
    let mut preset = AnalysisPreset::new("Wrap");
    preset.spectrogram.pad_mode = PadMode::Median;
    let err = preset.spectrogram(&[0.0; 4096]).unwrap_err();
    assert!(err.to_string().contains("median"), "got: {err}");

    preset.spectrogram.center = false;
    assert!(preset.spectrogram(&[0.0; 4096]).is_ok());
}

/// Every factory preset survives a TOML round trip.
#[test]
fn test_factory_presets_round_trip() {
    for preset in factory_presets() {
        let toml_str = preset.to_toml().expect("serialize");
        let parsed = AnalysisPreset::from_toml(&toml_str).expect("parse");
        assert_eq!(parsed, preset, "preset '{}' changed in round trip", preset.name);
    }
}
