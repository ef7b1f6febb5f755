//! Frame slicing for short-time analysis.
//!
//! [`frame`] returns a [`FrameView`] that borrows the signal: frame `i` is
//! `signal[i * hop .. i * hop + frame_length]`. [`frame_centered`] produces
//! the frames of the signal zero-padded by `n_fft / 2` on both sides, so
//! that frame `k` is centered on sample `k * hop`. For long signals only the
//! edge frames are copied into small padded buffers; interior frames are read
//! straight from the caller's buffer.

use crate::error::{AnalysisError, Result};
use crate::util::{pad_constant, valid_audio, valid_audio_channels};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Borrowed, overlapping frames of a 1-D signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView<'a> {
    signal: &'a [f64],
    frame_length: usize,
    hop_length: usize,
    n_frames: usize,
}

impl<'a> FrameView<'a> {
    /// Caller guarantees `(n_frames - 1) * hop + frame_length <= signal.len()`.
    fn from_parts(signal: &'a [f64], frame_length: usize, hop_length: usize, n_frames: usize) -> Self {
        Self {
            signal,
            frame_length,
            hop_length,
            n_frames,
        }
    }

    /// All complete frames of `signal`.
    fn covering(signal: &'a [f64], frame_length: usize, hop_length: usize) -> Self {
        let n_frames = if signal.len() >= frame_length {
            1 + (signal.len() - frame_length) / hop_length
        } else {
            0
        };
        Self::from_parts(signal, frame_length, hop_length, n_frames)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.n_frames
    }

    /// True when the view holds no frames.
    pub fn is_empty(&self) -> bool {
        self.n_frames == 0
    }

    /// Samples per frame.
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Samples between frame starts.
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Frame `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&'a [f64]> {
        if index >= self.n_frames {
            return None;
        }
        let start = index * self.hop_length;
        self.signal.get(start..start + self.frame_length)
    }

    /// Iterate frames in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [f64]> {
        let view = *self;
        (0..view.n_frames).filter_map(move |i| view.get(i))
    }

    /// Copy the frames into an owned `[frame][sample]` matrix.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.iter().map(<[f64]>::to_vec).collect()
    }
}

/// Slice a signal into overlapping frames without copying.
///
/// With `strict`, the frames must tile the signal exactly
/// (`(len - frame_length) % hop_length == 0`).
///
/// # Example
/// ```rust
/// use resona_analysis::framing::frame;
///
/// let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let frames = frame(&x, 3, 2, false).unwrap();
/// assert_eq!(frames.len(), 3);
/// assert_eq!(frames.get(1), Some(&[2.0, 3.0, 4.0][..]));
/// ```
pub fn frame(
    signal: &[f64],
    frame_length: usize,
    hop_length: usize,
    strict: bool,
) -> Result<FrameView<'_>> {
    valid_audio(signal)?;
    if frame_length == 0 {
        return Err(AnalysisError::invalid("frame_length must be > 0"));
    }
    if hop_length < 1 {
        return Err(AnalysisError::invalid(format!(
            "invalid hop_length: {hop_length}"
        )));
    }
    if signal.len() < frame_length {
        return Err(AnalysisError::invalid(format!(
            "input is too short (n={}) for frame_length={frame_length}",
            signal.len()
        )));
    }
    let span = signal.len() - frame_length;
    if strict && span % hop_length != 0 {
        return Err(AnalysisError::invalid(format!(
            "non-exact tiling: {} samples with frame_length={frame_length}, hop_length={hop_length}",
            signal.len()
        )));
    }
    Ok(FrameView::from_parts(
        signal,
        frame_length,
        hop_length,
        1 + span / hop_length,
    ))
}

/// Frame every channel of a multichannel buffer along time.
pub fn frame_channels(
    channels: &[Vec<f64>],
    frame_length: usize,
    hop_length: usize,
    strict: bool,
) -> Result<Vec<FrameView<'_>>> {
    valid_audio_channels(channels)?;
    channels
        .iter()
        .map(|ch| frame(ch, frame_length, hop_length, strict))
        .collect()
}

/// Boundary padding mode for centered analysis.
///
/// Only [`PadMode::Constant`] (zeros) is implemented; the rest are accepted
/// by the parser so they can be rejected explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadMode {
    /// Zero padding.
    #[default]
    Constant,
    /// Periodic extension.
    Wrap,
    /// Pad with the edge maximum.
    Maximum,
    /// Pad with the edge mean.
    Mean,
    /// Pad with the edge median.
    Median,
    /// Pad with the edge minimum.
    Minimum,
}

impl PadMode {
    /// Lowercase mode name.
    pub fn name(&self) -> &'static str {
        match self {
            PadMode::Constant => "constant",
            PadMode::Wrap => "wrap",
            PadMode::Maximum => "maximum",
            PadMode::Mean => "mean",
            PadMode::Median => "median",
            PadMode::Minimum => "minimum",
        }
    }

    /// Whether centered framing can use this mode.
    pub fn is_supported(&self) -> bool {
        matches!(self, PadMode::Constant)
    }
}

impl fmt::Display for PadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PadMode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "constant" => Ok(PadMode::Constant),
            "wrap" => Ok(PadMode::Wrap),
            "maximum" => Ok(PadMode::Maximum),
            "mean" => Ok(PadMode::Mean),
            "median" => Ok(PadMode::Median),
            "minimum" => Ok(PadMode::Minimum),
            _ => Err(AnalysisError::UnsupportedPadMode(s.to_string())),
        }
    }
}

/// How [`frame_centered`] builds the padded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingStrategy {
    /// Partial padding when the signal has interior frames, full otherwise.
    #[default]
    Auto,
    /// Pad the whole signal, then frame it.
    Full,
    /// Pad only the edge frames. Falls back to [`PaddingStrategy::Full`]
    /// when no frame lies fully inside the signal.
    Partial,
}

/// Frames of a centered, zero-padded signal.
///
/// Edge frames are owned; interior frames, when present, borrow the input.
#[derive(Debug, Clone, PartialEq)]
pub struct CenteredFrames<'a> {
    head: Vec<Vec<f64>>,
    body: Option<FrameView<'a>>,
    tail: Vec<Vec<f64>>,
    frame_length: usize,
}

impl CenteredFrames<'_> {
    /// Total number of frames.
    pub fn len(&self) -> usize {
        self.head.len() + self.body.map_or(0, |b| b.len()) + self.tail.len()
    }

    /// True when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples per frame (`n_fft`).
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// True when interior frames are read from the unpadded signal.
    pub fn is_partial(&self) -> bool {
        self.body.is_some()
    }

    /// Frame `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        if let Some(row) = self.head.get(index) {
            return Some(row);
        }
        let index = index - self.head.len();
        let body_len = self.body.map_or(0, |b| b.len());
        if index < body_len {
            return self.body.and_then(|b| b.get(index));
        }
        self.tail.get(index - body_len).map(Vec::as_slice)
    }

    /// Iterate frames in order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Copy the frames into an owned `[frame][sample]` matrix.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.iter().map(<[f64]>::to_vec).collect()
    }
}

/// Frame `signal` as if it were zero-padded by `n_fft / 2` on each side.
///
/// Produces `1 + (len + 2 * (n_fft / 2) - n_fft) / hop_length` frames. The
/// chosen strategy never changes the frame contents.
pub fn frame_centered(
    signal: &[f64],
    n_fft: usize,
    hop_length: usize,
    strategy: PaddingStrategy,
) -> Result<CenteredFrames<'_>> {
    valid_audio(signal)?;
    if n_fft == 0 {
        return Err(AnalysisError::invalid("n_fft must be > 0"));
    }
    if hop_length < 1 {
        return Err(AnalysisError::invalid(format!(
            "invalid hop_length: {hop_length}"
        )));
    }
    if signal.len() < n_fft {
        tracing::warn!(
            signal_len = signal.len(),
            n_fft,
            "n_fft is too large for input signal; frames will be zero-padded"
        );
    }

    let len = signal.len();
    let half = n_fft / 2;
    let n_frames = 1 + (len + 2 * half - n_fft) / hop_length;

    // Frames before start_k touch the left pad; frames from tail_k on touch the right pad
    let start_k = half.div_ceil(hop_length);
    let tail_k = (len as i64 + half as i64 - n_fft as i64).div_euclid(hop_length as i64) + 1;
    let has_interior = tail_k > start_k as i64;

    let partial = match strategy {
        PaddingStrategy::Auto | PaddingStrategy::Partial => has_interior,
        PaddingStrategy::Full => false,
    };
    if strategy == PaddingStrategy::Partial && !partial {
        tracing::debug!(len, n_fft, hop_length, "no interior frames; padding whole signal");
    }

    if !partial {
        let padded = pad_constant(signal, half, half, 0.0);
        let head = FrameView::covering(&padded, n_fft, hop_length).to_matrix();
        tracing::debug!(n_frames = head.len(), "centered framing with full padding");
        return Ok(CenteredFrames {
            head,
            body: None,
            tail: Vec::new(),
            frame_length: n_fft,
        });
    }

    let tail_k = tail_k as usize;

    let head = if start_k == 0 {
        Vec::new()
    } else {
        let end = (start_k - 1) * hop_length + n_fft - half;
        let pre = pad_constant(&signal[..end], half, 0, 0.0);
        let mut rows = FrameView::covering(&pre, n_fft, hop_length).to_matrix();
        rows.truncate(start_k);
        rows
    };

    let offset = start_k * hop_length - half;
    let body = FrameView::from_parts(&signal[offset..], n_fft, hop_length, tail_k - start_k);

    let tail = if n_frames > tail_k {
        let post = pad_constant(&signal[tail_k * hop_length - half..], 0, half, 0.0);
        FrameView::covering(&post, n_fft, hop_length).to_matrix()
    } else {
        Vec::new()
    };

    tracing::debug!(
        head = head.len(),
        body = body.len(),
        tail = tail.len(),
        "centered framing with partial padding"
    );

    Ok(CenteredFrames {
        head,
        body: Some(body),
        tail,
        frame_length: n_fft,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_frame_basic() {
        let x = ramp(7);
        let frames = frame(&x, 3, 2, false).unwrap();
        assert_eq!(
            frames.to_matrix(),
            vec![
                vec![0.0, 1.0, 2.0],
                vec![2.0, 3.0, 4.0],
                vec![4.0, 5.0, 6.0]
            ]
        );
        assert_eq!(frames.get(3), None);
    }

    #[test]
    fn test_frame_strict_tiling() {
        let x = ramp(7);
        assert!(frame(&x, 3, 2, true).is_ok());
        assert!(matches!(
            frame(&x, 3, 3, true),
            Err(AnalysisError::InvalidInput(_))
        ));
        // Non-strict drops the remainder
        assert_eq!(frame(&x, 3, 3, false).unwrap().len(), 2);
    }

    #[test]
    fn test_frame_rejects_bad_arguments() {
        let x = ramp(4);
        assert!(frame(&[], 1, 1, false).is_err());
        assert!(frame(&x, 0, 1, false).is_err());
        assert!(frame(&x, 2, 0, false).is_err());
        assert!(frame(&x, 5, 1, false).is_err());
        assert!(frame(&[0.0, f64::NAN], 1, 1, false).is_err());
    }

    #[test]
    fn test_frame_whole_signal() {
        let x = ramp(4);
        let frames = frame(&x, 4, 10, true).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.get(0), Some(&x[..]));
    }

    #[test]
    fn test_frame_channels() {
        let channels = vec![ramp(7), ramp(7)];
        let views = frame_channels(&channels, 3, 2, false).unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1].to_matrix(), views[0].to_matrix());

        let ragged = vec![ramp(7), ramp(6)];
        assert!(frame_channels(&ragged, 3, 2, false).is_err());
    }

    #[test]
    fn test_pad_mode_parsing() {
        assert_eq!("constant".parse::<PadMode>().unwrap(), PadMode::Constant);
        assert_eq!("Wrap".parse::<PadMode>().unwrap(), PadMode::Wrap);
        assert!(PadMode::Constant.is_supported());
        assert!(!PadMode::Median.is_supported());
        assert_eq!(
            "reflect".parse::<PadMode>(),
            Err(AnalysisError::UnsupportedPadMode("reflect".to_string()))
        );
    }

    #[test]
    fn test_centered_small_example() {
        let x = ramp(6);
        let frames = frame_centered(&x, 4, 2, PaddingStrategy::Full).unwrap();
        assert_eq!(
            frames.to_matrix(),
            vec![
                vec![0.0, 0.0, 0.0, 1.0],
                vec![0.0, 1.0, 2.0, 3.0],
                vec![2.0, 3.0, 4.0, 5.0],
                vec![4.0, 5.0, 0.0, 0.0],
            ]
        );
    }

    #[test]
    fn test_partial_matches_full() {
        for len in 1..40 {
            for n_fft in [1, 2, 3, 4, 5, 8] {
                for hop in [1, 2, 3, 4, 7, 9] {
                    let x: Vec<f64> = (0..len).map(|i| i as f64 + 1.0).collect();
                    let full = frame_centered(&x, n_fft, hop, PaddingStrategy::Full).unwrap();
                    let partial = frame_centered(&x, n_fft, hop, PaddingStrategy::Partial).unwrap();
                    assert_eq!(
                        partial.to_matrix(),
                        full.to_matrix(),
                        "len={len} n_fft={n_fft} hop={hop}"
                    );
                    assert_eq!(full.len(), 1 + (len + 2 * (n_fft / 2) - n_fft) / hop);
                }
            }
        }
    }

    #[test]
    fn test_auto_uses_partial_for_long_signals() {
        let x = ramp(64);
        let frames = frame_centered(&x, 8, 2, PaddingStrategy::Auto).unwrap();
        assert!(frames.is_partial());
        assert_eq!(frames.len(), 33);
        assert_eq!(frames.get(2), Some(&x[0..8]));

        let short = ramp(5);
        let frames = frame_centered(&short, 8, 2, PaddingStrategy::Partial).unwrap();
        assert!(!frames.is_partial());
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_centered_get_matches_iter() {
        let x = ramp(30);
        let frames = frame_centered(&x, 6, 4, PaddingStrategy::Auto).unwrap();
        for (i, row) in frames.iter().enumerate() {
            assert_eq!(frames.get(i), Some(row));
        }
        assert_eq!(frames.get(frames.len()), None);
        assert_eq!(frames.frame_length(), 6);
    }

    #[test]
    fn test_centered_rejects_bad_arguments() {
        let x = ramp(8);
        assert!(frame_centered(&x, 0, 1, PaddingStrategy::Auto).is_err());
        assert!(frame_centered(&x, 4, 0, PaddingStrategy::Auto).is_err());
        assert!(frame_centered(&[], 4, 1, PaddingStrategy::Auto).is_err());
    }
}
