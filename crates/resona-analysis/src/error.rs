//! Error types for filter-bank and framing operations.

use thiserror::Error;

/// Errors raised by the analysis routines.
///
/// Every error is raised synchronously by the call that detects it. Nothing
/// is retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Bad shape, size, or range of an argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A window name that is well-formed but not implemented.
    #[error("unsupported window: {0}")]
    UnsupportedWindow(String),

    /// A padding mode that is recognized but rejected for centered analysis.
    #[error("unsupported pad mode: {0}")]
    UnsupportedPadMode(String),

    /// An explicit window vector of the wrong length.
    #[error("window size mismatch: expected {expected} coefficients, got {actual}")]
    SizeMismatch {
        /// Requested window length.
        expected: usize,
        /// Length of the supplied coefficient vector.
        actual: usize,
    },

    /// A ragged prototype filter matrix.
    #[error("filter {row} has {actual} taps, expected {expected}")]
    DimensionMismatch {
        /// Index of the offending filter row.
        row: usize,
        /// Tap count of the first row.
        expected: usize,
        /// Tap count of the offending row.
        actual: usize,
    },
}

impl AnalysisError {
    /// Create an invalid input error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput(reason.into())
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
