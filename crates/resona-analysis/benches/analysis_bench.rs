//! Criterion benchmarks for resona-analysis components
//!
//! Run with: cargo bench -p resona-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use resona_analysis::{
    FilterBankAssembler, FrequencySet, PaddingStrategy, Stft, WaveletParams, Window,
    frame_centered, vqt_filter_fft,
};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 22050.0;

/// Generate a complex test signal with multiple harmonics
fn generate_complex_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let f1 = (2.0 * PI * 440.0 * t).sin();
            let f2 = 0.5 * (2.0 * PI * 880.0 * t).sin();
            let f3 = 0.25 * (2.0 * PI * 1320.0 * t).sin();
            (f1 + f2 + f3) * 0.5
        })
        .collect()
}

// ============================================================================
// Window benchmarks
// ============================================================================

fn bench_window_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Window");

    let windows = [
        ("Hann", Window::Hann),
        ("Hamming", Window::Hamming),
        ("Kaiser", Window::Kaiser { beta: 14.0 }),
    ];

    for (name, window) in &windows {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(window.coefficients(black_box(4096), true)))
        });
    }

    group.finish();
}

// ============================================================================
// Filter bank benchmarks
// ============================================================================

fn bench_filter_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("VQT_FilterBank");
    group.sample_size(20);

    let params = WaveletParams::new(SAMPLE_RATE);
    let assembler = FilterBankAssembler::new().with_hop_length(512);

    for &octaves in &[3usize, 5, 7] {
        let freqs = FrequencySet::geometric(32.70, octaves * 12, 12).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(octaves), &octaves, |b, _| {
            b.iter(|| black_box(vqt_filter_fft(freqs.as_slice(), &params, &assembler).unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// Framing benchmarks
// ============================================================================

fn bench_centered_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("CenteredFraming");
    let signal = generate_complex_signal(SAMPLE_RATE as usize * 10);

    for (name, strategy) in [
        ("Full", PaddingStrategy::Full),
        ("Partial", PaddingStrategy::Partial),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let frames = frame_centered(black_box(&signal), 2048, 512, strategy).unwrap();
                black_box(frames.len())
            })
        });
    }

    group.finish();
}

// ============================================================================
// STFT benchmarks
// ============================================================================

fn bench_stft_hop_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("STFT_HopSize");
    let signal = generate_complex_signal(SAMPLE_RATE as usize * 2);

    for &hop in &[128usize, 256, 512, 1024] {
        let stft = Stft::new(2048).with_hop_length(hop);
        group.bench_with_input(BenchmarkId::from_parameter(hop), &hop, |b, _| {
            b.iter(|| black_box(stft.process(black_box(&signal)).unwrap()))
        });
    }

    group.finish();
}

fn bench_spectrogram_power(c: &mut Criterion) {
    let mut group = c.benchmark_group("Spectrogram");
    let signal = generate_complex_signal(SAMPLE_RATE as usize * 2);
    let stft = Stft::new(2048).with_hop_length(512);

    for (name, power) in [("Magnitude", 1.0), ("Power", 2.0), ("Root", 0.5)] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(stft.spectrogram(black_box(&signal), power, SAMPLE_RATE).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_window_functions,
    bench_filter_bank,
    bench_centered_framing,
    bench_stft_hop_sizes,
    bench_spectrogram_power,
);

criterion_main!(benches);
