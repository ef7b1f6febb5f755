//! Preset demo: factory presets, custom presets, and building analyses from them.
//!
//! Run with: cargo run -p resona-config --example preset_demo

use resona_analysis::WindowSpec;
use resona_config::{
    AnalysisPreset, FilterSettings, SpectrogramSettings, factory_preset_names,
    get_factory_preset, is_factory_preset,
};
use std::f64::consts::PI;

fn main() {
    // --- Factory presets ---
    println!("=== Factory Presets ===\n");

    for name in factory_preset_names() {
        let preset = get_factory_preset(name).unwrap();
        println!(
            "{:<8} {:>8.0} Hz  {}",
            name,
            preset.sample_rate,
            preset.description.as_deref().unwrap_or("")
        );
    }
    println!("\n'cqt' is a factory preset: {}", is_factory_preset("cqt"));

    // --- Custom preset ---
    println!("\n=== Custom Preset ===\n");

    let preset = AnalysisPreset::new("Piano")
        .with_description("Full piano range")
        .with_sample_rate(44100.0)
        .with_filters(FilterSettings {
            fmin: 27.5,
            n_bins: 88,
            ..FilterSettings::default()
        })
        .with_spectrogram(SpectrogramSettings {
            n_fft: 4096,
            window: WindowSpec::Parameterized("kaiser".to_string(), 14.0),
            power: 1.0,
            ..SpectrogramSettings::default()
        });

    match preset.validate() {
        Ok(()) => println!("'{}' is valid", preset.name),
        Err(e) => println!("'{}' is invalid: {e}", preset.name),
    }
    println!("\n{}", preset.to_toml().unwrap());

    // --- Build analyses ---
    println!("=== Analyses From Presets ===\n");

    let bank = preset.filter_bank().unwrap();
    println!(
        "Piano bank: {} filters, FFT size {}",
        bank.num_filters(),
        bank.n_fft()
    );

    let speech = get_factory_preset("speech").unwrap();
    let signal: Vec<f64> = (0..16000)
        .map(|i| (2.0 * PI * 300.0 * i as f64 / speech.sample_rate).sin())
        .collect();
    let spec = speech.spectrogram(&signal).unwrap();
    println!(
        "Speech spectrogram: {} bins x {} frames, peak {:.1} Hz",
        spec.num_bins(),
        spec.num_frames(),
        spec.peak_frequency(spec.num_frames() / 2).unwrap()
    );
}
