//! Numeric helpers shared by the window and filter-bank modules.
//!
//! - [`bessel_i0`] - Modified Bessel function of the first kind, order 0
//! - [`min_fft_len_for_hop`] - Smallest FFT length allowed for a given hop
//! - [`to_db`] - Magnitude to decibels with a floor

/// Series coefficients of I0 for `|x| < 3.75` (Abramowitz & Stegun 9.8.1).
const I0_SMALL: [f64; 7] = [
    1.0, 3.5156229, 3.0899424, 1.2067492, 0.2659732, 0.0360768, 0.0045813,
];

/// Asymptotic coefficients of `sqrt(x) * exp(-x) * I0(x)` for `|x| >= 3.75`
/// (Abramowitz & Stegun 9.8.2).
const I0_LARGE: [f64; 9] = [
    0.39894228,
    0.01328592,
    0.00225319,
    -0.00157565,
    0.00916281,
    -0.02057706,
    0.02635537,
    -0.01647633,
    0.00392377,
];

/// Evaluate a polynomial with Horner's scheme, lowest order first.
#[inline]
fn horner(coeffs: &[f64], y: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * y + c)
}

/// Modified Bessel function of the first kind, order 0.
///
/// Polynomial approximation: a series in `(x / 3.75)^2` below 3.75, an
/// asymptotic expansion in `3.75 / |x|` above. Relative error is below 2e-7
/// over the real line.
///
/// # Example
/// ```rust
/// use resona_analysis::math::bessel_i0;
///
/// assert!((bessel_i0(0.0) - 1.0).abs() < 1e-12);
/// assert!((bessel_i0(1.0) - 1.2660658).abs() < 1e-6);
/// ```
pub fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 3.75 {
        let y = (x / 3.75) * (x / 3.75);
        horner(&I0_SMALL, y)
    } else {
        let y = 3.75 / ax;
        ax.exp() / ax.sqrt() * horner(&I0_LARGE, y)
    }
}

/// Smallest FFT length `2^ceil(log2(hop) + 1)` that gives enough frequency
/// resolution for fast convolution at the given hop.
///
/// `hop_length` must be at least 1.
pub fn min_fft_len_for_hop(hop_length: usize) -> usize {
    hop_length.next_power_of_two() << 1
}

/// Convert a magnitude to decibels, flooring at 1e-10.
#[inline]
pub fn to_db(magnitude: f64) -> f64 {
    20.0 * magnitude.max(1e-10).log10()
}
