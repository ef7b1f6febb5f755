//! VQT demo: filter lengths, a frequency-domain filter bank, and a spectrogram.
//!
//! Run with: cargo run -p resona-analysis --example vqt_bank

use resona_analysis::{
    Fft, FilterBankAssembler, ForwardTransform, FrequencySet, WaveletParams, Window,
    spectrogram, vqt_filter_fft, wavelet_lengths,
};
use std::f64::consts::PI;

fn main() {
    let sample_rate = 22050.0;

    // --- Length planning ---
    println!("=== Filter Lengths (C2..C5, semitones) ===\n");

    let freqs = FrequencySet::geometric(65.41, 37, 12).unwrap();
    let plan = wavelet_lengths(freqs.as_slice(), sample_rate, "hann", 1.0, None, None).unwrap();

    println!("{:>10} {:>8} {:>10} {:>10}", "Freq (Hz)", "Q", "Gamma", "Length");
    println!("{:->10} {:->8} {:->10} {:->10}", "", "", "", "");
    for i in (0..plan.len()).step_by(6) {
        println!(
            "{:>10.2} {:>8.2} {:>10.3} {:>10.1}",
            freqs.as_slice()[i],
            plan.q[i],
            plan.gamma[i],
            plan.lengths[i]
        );
    }
    println!("\nCutoff frequency: {:.1} Hz", plan.f_cutoff);

    // --- Filter bank ---
    println!("\n=== Frequency-Domain Filter Bank ===\n");

    let params = WaveletParams::new(sample_rate);
    let assembler = FilterBankAssembler::new().with_hop_length(512);
    let bank = vqt_filter_fft(freqs.as_slice(), &params, &assembler).unwrap();

    let nonzero: usize = bank.nonzero_counts().iter().sum();
    let total = bank.num_filters() * bank.num_bins();
    println!("Filters: {}, FFT size: {}", bank.num_filters(), bank.n_fft());
    println!(
        "Non-zero coefficients: {} of {} ({:.1}%)",
        nonzero,
        total,
        100.0 * nonzero as f64 / total as f64
    );

    // --- Response to a tone ---
    println!("\n=== Response to a 440 Hz Tone ===\n");

    let n = bank.n_fft();
    let mut tone: Vec<f64> = (0..n)
        .map(|i| (2.0 * PI * 440.0 * i as f64 / sample_rate).sin())
        .collect();
    Window::Hann.apply(&mut tone, true);
    let response = bank.response(&Fft::new().forward_one_sided(&tone, n)).unwrap();

    let (best, _) = response
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
        .unwrap();
    println!(
        "Strongest filter: #{} at {:.2} Hz (|r| = {:.3})",
        best,
        freqs.as_slice()[best],
        response[best].norm()
    );

    // --- Spectrogram ---
    println!("\n=== Power Spectrogram ===\n");

    let signal: Vec<f64> = (0..sample_rate as usize)
        .map(|i| (2.0 * PI * 1000.0 * i as f64 / sample_rate).sin())
        .collect();
    let spec = spectrogram(&signal, 2048, 512, 2.0, sample_rate).unwrap();

    println!("Bins: {}, Frames: {}", spec.num_bins(), spec.num_frames());
    println!("Frequency resolution: {:.2} Hz", spec.bin_to_freq(1));
    println!("Time resolution: {:.1} ms", spec.frame_to_time(1) * 1000.0);
    let mid = spec.num_frames() / 2;
    println!(
        "Peak at frame {}: {:.1} Hz",
        mid,
        spec.peak_frequency(mid).unwrap()
    );
}
