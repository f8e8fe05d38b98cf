//! Error types for oceanographic analysis routines.
//!
//! Every fallible operation in the crate returns [`AnalysisError`]. Degenerate
//! but well-defined numerical input (zero variance, NaN samples passed to
//! [`rotate`](crate::rotate)) is not an error and propagates through the
//! arithmetic instead.

use thiserror::Error;

/// Main error type for analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input validation errors.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not enough usable samples.
    #[error("Insufficient data: need at least {min} samples, got {actual}")]
    InsufficientData { min: usize, actual: usize },

    /// Paired inputs have different lengths.
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Welch segment is longer than the record.
    #[error("Segment length {segment_length} exceeds record length {n}")]
    SegmentTooLong { segment_length: usize, n: usize },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Window name not recognized.
    #[error("Unknown window function: {0:?}")]
    UnknownWindow(String),

    /// Linear algebra computation failed.
    #[error("Linear algebra error: {0}")]
    LinalgError(String),

    /// Probability distribution could not be constructed or evaluated.
    #[error("Statistics error: {0}")]
    StatisticsError(String),
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an insufficient data error.
    #[must_use]
    pub const fn insufficient_data(min: usize, actual: usize) -> Self {
        Self::InsufficientData { min, actual }
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// Create a segment-too-long error.
    #[must_use]
    pub const fn segment_too_long(segment_length: usize, n: usize) -> Self {
        Self::SegmentTooLong { segment_length, n }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unknown window error.
    #[must_use]
    pub fn unknown_window(name: impl Into<String>) -> Self {
        Self::UnknownWindow(name.into())
    }

    /// Create a linear algebra error.
    #[must_use]
    pub fn linalg(msg: impl Into<String>) -> Self {
        Self::LinalgError(msg.into())
    }

    /// Create a statistics error.
    #[must_use]
    pub fn statistics(msg: impl Into<String>) -> Self {
        Self::StatisticsError(msg.into())
    }
}

/// Fail with [`AnalysisError::LengthMismatch`] unless both lengths agree.
pub(crate) fn ensure_same_len(left: usize, right: usize) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(AnalysisError::length_mismatch(left, right))
    }
}
