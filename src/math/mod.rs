//! Numerical building blocks shared by the analysis modules.
//!
//! This module provides:
//! - [`fft`]: real-input FFT plans and frequency grids
//! - [`linalg`]: 2x2 covariance of paired samples
//! - [`window`]: taper windows for spectral estimation and filtering

pub mod fft;
pub mod linalg;
pub mod window;

pub use fft::{fftfreq, rfftfreq, RealFft};
pub use linalg::finite_covariance;
pub use window::{periodic_window, symmetric_window, window_energy};
