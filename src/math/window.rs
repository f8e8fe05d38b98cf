//! Window function coefficients.
//!
//! Windows taper a segment toward its ends to reduce spectral leakage from
//! the implicit periodic extension of the FFT. Spectral estimation uses the
//! periodic (DFT-even) form, FIR filter design uses the symmetric form.

use std::f64::consts::PI;

use crate::config::WindowFunction;

/// Generate a symmetric window of length `n`.
///
/// The first and last coefficients mirror each other, which is what filter
/// design wants.
#[must_use]
pub fn symmetric_window(n: usize, window: WindowFunction) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }

    let denom = (n - 1) as f64;
    let coeffs: Vec<f64> = match window {
        WindowFunction::Boxcar => vec![1.0; n],
        WindowFunction::Bartlett => (0..n)
            .map(|i| 1.0 - (2.0 * i as f64 / denom - 1.0).abs())
            .collect(),
        WindowFunction::Hanning => (0..n)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / denom).cos())
            .collect(),
        WindowFunction::Hamming => (0..n)
            .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / denom).cos())
            .collect(),
        WindowFunction::Parzen => {
            let half = n as f64 / 2.0;
            (0..n)
                .map(|i| {
                    let r = (i as f64 - denom / 2.0).abs();
                    let x = r / half;
                    if r <= denom / 4.0 {
                        1.0 - 6.0 * x * x + 6.0 * x * x * x
                    } else {
                        2.0 * (1.0 - x).powi(3)
                    }
                })
                .collect()
        }
    };
    coeffs.into_iter().map(|w| w.clamp(0.0, 1.0)).collect()
}

/// Generate a periodic window of length `n` for spectral analysis.
///
/// This is the symmetric window of length `n + 1` with its last point
/// dropped, so the taper lines up with the FFT period.
#[must_use]
pub fn periodic_window(n: usize, window: WindowFunction) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let mut w = symmetric_window(n + 1, window);
    w.truncate(n);
    w
}

/// Sum of squared window weights.
#[must_use]
pub fn window_energy(window: &[f64]) -> f64 {
    window.iter().map(|w| w * w).sum()
}
