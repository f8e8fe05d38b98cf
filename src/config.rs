//! Configuration for spectral estimation.
//!
//! This module provides the [`WelchConfig`] struct which collects the tunable
//! parameters of Welch's method, along with the [`WindowFunction`] and
//! [`Detrend`] choices and a few presets.
//!
//! # Example
//!
//! ```
//! use oceanstats::{Detrend, WelchConfig, WindowFunction};
//!
//! // Reproduces the raw periodogram
//! let raw = WelchConfig::periodogram();
//!
//! // Quarter-length segments, Hamming window, linear detrend
//! let smoothed = WelchConfig::segmented(256)
//!     .with_window(WindowFunction::Hamming)
//!     .with_detrend(Detrend::Linear);
//! assert!(smoothed.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for Welch power spectral density estimation.
///
/// With the default configuration (full-length segment, boxcar window, no
/// detrending) [`welch_psd`](crate::welch_psd) reproduces the raw
/// [`periodogram`](crate::periodogram).
///
/// Shorter segments average more periodograms together, which lowers the
/// variance of every PSD estimate by roughly the number of segments but
/// widens the frequency spacing to `fs / segment_length`. That trade-off is
/// inherent to the method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WelchConfig {
    /// Samples per segment. `None` uses the whole record.
    pub segment_length: Option<usize>,

    /// Samples shared by consecutive segments. `None` uses half a segment.
    pub overlap: Option<usize>,

    /// Taper applied to each segment before its FFT.
    pub window: WindowFunction,

    /// Trend removed from the whole record before segmentation.
    pub detrend: Detrend,
}

/// Tapering window applied to each segment.
///
/// Every window yields weights in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowFunction {
    /// Rectangular window, all weights 1.
    #[default]
    Boxcar,
    /// Triangular window reaching zero at both ends.
    Bartlett,
    /// Raised cosine (Hann) window.
    Hanning,
    /// Hamming window, a raised cosine that stays at 0.08 at the edges.
    Hamming,
    /// Piecewise cubic Parzen window.
    Parzen,
}

/// Trend removal applied before spectral estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Detrend {
    /// Leave the record untouched.
    #[default]
    None,
    /// Subtract the record mean.
    Mean,
    /// Subtract the least-squares line fitted against sample index.
    Linear,
}

impl WindowFunction {
    /// All supported windows.
    pub const ALL: [Self; 5] = [
        Self::Boxcar,
        Self::Bartlett,
        Self::Hanning,
        Self::Hamming,
        Self::Parzen,
    ];

    /// Canonical lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boxcar => "boxcar",
            Self::Bartlett => "bartlett",
            Self::Hanning => "hanning",
            Self::Hamming => "hamming",
            Self::Parzen => "parzen",
        }
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowFunction {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boxcar" | "rectangular" | "rect" | "ones" => Ok(Self::Boxcar),
            "bartlett" | "triangular" => Ok(Self::Bartlett),
            "hann" | "hanning" => Ok(Self::Hanning),
            "hamming" => Ok(Self::Hamming),
            "parzen" => Ok(Self::Parzen),
            _ => Err(AnalysisError::unknown_window(s)),
        }
    }
}

impl FromStr for Detrend {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "mean" | "constant" => Ok(Self::Mean),
            "linear" => Ok(Self::Linear),
            other => Err(AnalysisError::invalid_config(format!(
                "unknown detrend method {other:?}"
            ))),
        }
    }
}

impl WelchConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset reproducing the raw periodogram: one full-length segment,
    /// boxcar window, no detrending.
    #[must_use]
    pub fn periodogram() -> Self {
        Self::default()
    }

    /// Preset for a smoothed estimate: segments of `segment_length` samples
    /// with 50% overlap, Hanning window and linear detrending.
    #[must_use]
    pub fn segmented(segment_length: usize) -> Self {
        Self {
            segment_length: Some(segment_length),
            overlap: None,
            window: WindowFunction::Hanning,
            detrend: Detrend::Linear,
        }
    }

    /// Set the segment length.
    #[must_use]
    pub const fn with_segment_length(mut self, segment_length: usize) -> Self {
        self.segment_length = Some(segment_length);
        self
    }

    /// Set the overlap between consecutive segments.
    #[must_use]
    pub const fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = Some(overlap);
        self
    }

    /// Set the window function.
    #[must_use]
    pub const fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = window;
        self
    }

    /// Set the detrending method.
    #[must_use]
    pub const fn with_detrend(mut self, detrend: Detrend) -> Self {
        self.detrend = detrend;
        self
    }

    /// Validate the parameters that do not depend on the record length.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment length is below 2 or the overlap is
    /// not smaller than the segment length.
    pub fn validate(&self) -> Result<()> {
        if let Some(len) = self.segment_length {
            if len < 2 {
                return Err(AnalysisError::invalid_config(
                    "segment_length must be at least 2",
                ));
            }
            if let Some(overlap) = self.overlap {
                if overlap >= len {
                    return Err(AnalysisError::invalid_config(format!(
                        "overlap ({overlap}) must be smaller than segment_length ({len})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Resolve segment length and overlap for a record of `n` samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the segment is
    /// longer than the record.
    pub fn resolve(&self, n: usize) -> Result<(usize, usize)> {
        self.validate()?;
        let segment_length = self.segment_length.unwrap_or(n);
        if segment_length > n {
            return Err(AnalysisError::segment_too_long(segment_length, n));
        }
        if segment_length < 2 {
            return Err(AnalysisError::insufficient_data(2, n));
        }
        let overlap = self.overlap.unwrap_or(segment_length / 2);
        if overlap >= segment_length {
            return Err(AnalysisError::invalid_config(format!(
                "overlap ({overlap}) must be smaller than segment_length ({segment_length})"
            )));
        }
        Ok((segment_length, overlap))
    }
}
