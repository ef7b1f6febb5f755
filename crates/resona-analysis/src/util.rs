//! Buffer validation and padding utilities.

use crate::error::{AnalysisError, Result};

/// Check that a mono buffer holds usable audio: non-empty and finite everywhere.
pub fn valid_audio(signal: &[f64]) -> Result<()> {
    if signal.is_empty() {
        return Err(AnalysisError::invalid(
            "audio data must have at least one sample",
        ));
    }
    if let Some(i) = signal.iter().position(|x| !x.is_finite()) {
        return Err(AnalysisError::invalid(format!(
            "audio buffer is not finite everywhere (sample {i})"
        )));
    }
    Ok(())
}

/// Check every channel of a multichannel buffer and that all channels share a length.
pub fn valid_audio_channels(channels: &[Vec<f64>]) -> Result<()> {
    let Some(first) = channels.first() else {
        return Err(AnalysisError::invalid("audio data must have at least one channel"));
    };
    for (ch, data) in channels.iter().enumerate() {
        if data.len() != first.len() {
            return Err(AnalysisError::invalid(format!(
                "channel {ch} has {} samples, expected {}",
                data.len(),
                first.len()
            )));
        }
        valid_audio(data)?;
    }
    Ok(())
}

/// Pad a buffer with `before` and `after` copies of `value`.
///
/// # Example
/// ```rust
/// use resona_analysis::util::pad_constant;
///
/// assert_eq!(pad_constant(&[1.0, 2.0], 1, 2, 0.0), vec![0.0, 1.0, 2.0, 0.0, 0.0]);
/// ```
pub fn pad_constant(data: &[f64], before: usize, after: usize, value: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(before + data.len() + after);
    out.resize(before, value);
    out.extend_from_slice(data);
    out.resize(before + data.len() + after, value);
    out
}

/// Zero-pad `data` to `size` samples, centered.
///
/// When the total padding is odd the extra sample goes on the left.
pub fn pad_center(data: &[f64], size: usize) -> Result<Vec<f64>> {
    if size < data.len() {
        return Err(AnalysisError::invalid(format!(
            "target size ({size}) must be at least input size ({})",
            data.len()
        )));
    }
    let total = size - data.len();
    let lpad = total.div_ceil(2);
    Ok(pad_constant(data, lpad, total - lpad, 0.0))
}
