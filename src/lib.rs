//! Oceanographic Time-Series Statistics
//!
//! Principal-axis and spectral analysis for evenly sampled records such as
//! moored current meters, buoy winds, and tide gauges.
//!
//! # Features
//!
//! - **Principal axes**: orientation and spread of 2-D vector series, with
//!   pairwise removal of missing samples
//! - **Rotation**: express vectors in a rotated (e.g. alongshore) frame
//! - **Spectra**: raw periodogram and Welch's segment-averaged, windowed
//!   estimate with chi-squared confidence intervals
//! - **Filtering and regression**: running means, cosine-Lanczos low-pass
//!   weights, line fits, and general least squares
//!
//! # Quick Start
//!
//! ```
//! use oceanstats::{natural_coordinates, welch_psd, WelchConfig};
//!
//! // Wind components blowing mostly along a 30 degree axis
//! let n = 512;
//! let (u, v): (Vec<f64>, Vec<f64>) = (0..n)
//!     .map(|i| {
//!         let t = i as f64;
//!         let along = 5.0 * (0.05 * t).sin();
//!         let across = 0.5 * (0.31 * t).cos();
//!         let (s, c) = 30f64.to_radians().sin_cos();
//!         (along * c - across * s, along * s + across * c)
//!     })
//!     .unzip();
//!
//! let frame = natural_coordinates(&u, &v)?;
//! assert!((frame.axes.theta - 30.0).abs() < 1.0);
//!
//! // Hourly samples, frequencies in cycles per day
//! let config = WelchConfig::segmented(128);
//! let spectrum = welch_psd(&frame.alongshore, 24.0, &config)?;
//! let ci = spectrum.confidence_interval(0.95)?;
//! assert!(ci.lower < 1.0 && 1.0 < ci.upper);
//! # Ok::<(), oceanstats::AnalysisError>(())
//! ```
//!
//! # Spectral Presets
//!
//! ```
//! use oceanstats::{WelchConfig, WindowFunction};
//!
//! let raw = WelchConfig::periodogram();
//! let smooth = WelchConfig::segmented(256);
//! let custom = WelchConfig::new()
//!     .with_segment_length(512)
//!     .with_overlap(0)
//!     .with_window(WindowFunction::Hamming);
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod config;
pub mod detrend;
pub mod error;
pub mod filter;
pub mod math;
pub mod parallel;
pub mod principal_axis;
pub mod regression;
pub mod spectrum;

// Re-exports for convenient access
pub use config::{Detrend, WelchConfig, WindowFunction};
pub use detrend::{detrend_linear, detrend_mean, detrend_polynomial, TrendFit};
pub use error::{AnalysisError, Result};
pub use filter::{boxcar_weights, convolve_same, lanczos_weights, running_mean};
pub use principal_axis::{
    natural_coordinates, principal_axis, principal_axis_complex, rotate, rotate_complex,
    NaturalCoordinates, PrincipalAxes,
};
pub use regression::{least_squares, linregress, LeastSquaresFit, LinearFit};
pub use spectrum::{
    confidence_interval, equivalent_dof, periodogram, periodogram_two_sided, welch_psd,
    ConfidenceInterval, Spectrum,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
