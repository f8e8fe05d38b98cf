//! FFT helpers for spectral estimation.
//!
//! Thin wrappers around `rustfft` that keep the conventional bin ordering:
//! zero frequency first, positive frequencies ascending, then the mirrored
//! negative frequencies.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// A forward FFT plan for real input of a fixed length.
///
/// The plan is cheap to share between threads, so Welch segments can reuse
/// one plan.
#[derive(Clone)]
pub struct RealFft {
    len: usize,
    fft: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft").field("len", &self.len).finish()
    }
}

impl RealFft {
    /// Plan a forward transform of `len` points.
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);
        Self { len, fft }
    }

    /// Transform length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the transform has zero length.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forward transform of `signal` multiplied elementwise by `weights`.
    ///
    /// Both slices must have the transform length.
    #[must_use]
    pub fn forward_weighted(&self, signal: &[f64], weights: &[f64]) -> Vec<Complex<f64>> {
        debug_assert_eq!(signal.len(), self.len);
        debug_assert_eq!(weights.len(), self.len);
        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .zip(weights.iter())
            .map(|(&x, &w)| Complex::new(x * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);
        buffer
    }

    /// Forward transform of `signal`.
    #[must_use]
    pub fn forward(&self, signal: &[f64]) -> Vec<Complex<f64>> {
        debug_assert_eq!(signal.len(), self.len);
        let mut buffer: Vec<Complex<f64>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.fft.process(&mut buffer);
        buffer
    }

    /// One-sided squared magnitudes `c_k |X_k|^2` for `k = 0..=len/2`, where
    /// `c_k = 2` except at zero frequency and (for even lengths) Nyquist.
    ///
    /// The result is unnormalized; divide by `fs * sum(w^2)` for a density.
    #[must_use]
    pub fn one_sided_power(&self, signal: &[f64], weights: &[f64]) -> Vec<f64> {
        let spectrum = self.forward_weighted(signal, weights);
        let n = self.len;
        (0..=n / 2)
            .map(|k| {
                let p = spectrum[k].norm_sqr();
                if k == 0 || (n % 2 == 0 && k == n / 2) {
                    p
                } else {
                    2.0 * p
                }
            })
            .collect()
    }
}

/// Sample frequencies of an `n`-point FFT with sample spacing `dt`, in the
/// standard FFT layout.
///
/// ```
/// use oceanstats::math::fft::fftfreq;
///
/// assert_eq!(fftfreq(4, 0.25), vec![0.0, 1.0, -2.0, -1.0]);
/// ```
#[must_use]
pub fn fftfreq(n: usize, dt: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * dt);
    let n_pos = (n - 1) / 2 + 1;
    (0..n)
        .map(|k| {
            if k < n_pos {
                k as f64 * scale
            } else {
                -((n - k) as f64) * scale
            }
        })
        .collect()
}

/// Non-negative sample frequencies `k / (n dt)` for `k = 0..=n/2`.
#[must_use]
pub fn rfftfreq(n: usize, dt: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * dt);
    (0..=n / 2).map(|k| k as f64 * scale).collect()
}
