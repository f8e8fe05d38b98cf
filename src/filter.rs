//! FIR low-pass filtering of evenly sampled series.
//!
//! Two weight sets are provided: a running mean ([`boxcar_weights`]) and a
//! Hanning-tapered windowed sinc ([`lanczos_weights`]), often called a
//! cosine-Lanczos filter. The boxcar has strong side lobes that let energy
//! leak through above its nominal cutoff; the tapered sinc trades a wider
//! transition band for much lower side lobes.
//!
//! [`convolve_same`] applies a weight set and keeps the output aligned with
//! the input. The first and last `len(w) / 2` outputs are affected by the
//! implicit zero padding.
//!
//! ```
//! use oceanstats::filter::{convolve_same, lanczos_weights};
//!
//! // Hourly data, remove periods shorter than 40 hours
//! let weights = lanczos_weights(121, 1.0 / 40.0, 1.0)?;
//! let x: Vec<f64> = (0..500).map(|i| (i as f64 * 0.5).sin()).collect();
//! let smooth = convolve_same(&x, &weights)?;
//! assert_eq!(smooth.len(), x.len());
//! assert!(smooth[250].abs() < 0.01);
//! # Ok::<(), oceanstats::AnalysisError>(())
//! ```

use tracing::trace;

use crate::config::WindowFunction;
use crate::error::{AnalysisError, Result};
use crate::math::window::symmetric_window;

/// `n` equal weights summing to one.
#[must_use]
pub fn boxcar_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Windowed-sinc low-pass weights with a Hanning taper.
///
/// `cutoff` is in the same units as `fs` and must lie strictly between zero
/// and the Nyquist frequency `fs / 2`. The weights are normalized to unit
/// sum so the filter passes a constant unchanged.
///
/// # Errors
///
/// Fails for zero taps, a non-positive sampling rate, or a cutoff outside
/// `(0, fs / 2)`.
pub fn lanczos_weights(numtaps: usize, cutoff: f64, fs: f64) -> Result<Vec<f64>> {
    if numtaps == 0 {
        return Err(AnalysisError::invalid_config("numtaps must be positive"));
    }
    if !(fs.is_finite() && fs > 0.0) {
        return Err(AnalysisError::invalid_config(format!(
            "sampling rate must be positive and finite, got {fs}"
        )));
    }
    let nyquist = fs / 2.0;
    if !(cutoff > 0.0 && cutoff < nyquist) {
        return Err(AnalysisError::invalid_config(format!(
            "cutoff {cutoff} must lie in (0, {nyquist})"
        )));
    }

    let c = cutoff / nyquist;
    let alpha = (numtaps - 1) as f64 / 2.0;
    let taper = symmetric_window(numtaps, WindowFunction::Hanning);

    let mut weights: Vec<f64> = taper
        .iter()
        .enumerate()
        .map(|(i, &t)| c * sinc(c * (i as f64 - alpha)) * t)
        .collect();

    // A single tap or a degenerate taper leaves nothing to normalize
    let total: f64 = weights.iter().sum();
    if total.abs() > f64::EPSILON {
        for w in &mut weights {
            *w /= total;
        }
    } else {
        weights = vec![1.0 / numtaps as f64; numtaps];
    }
    trace!(numtaps, cutoff, fs, "lanczos_weights: designed low-pass taps");
    Ok(weights)
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

/// Convolve `x` with `w`, returning the `len(x)` central samples of the full
/// convolution.
///
/// # Errors
///
/// Fails when `w` is empty or longer than `x`.
pub fn convolve_same(x: &[f64], w: &[f64]) -> Result<Vec<f64>> {
    let n = x.len();
    let m = w.len();
    if m == 0 {
        return Err(AnalysisError::invalid_input("filter weights are empty"));
    }
    if m > n {
        return Err(AnalysisError::invalid_input(format!(
            "filter length {m} exceeds series length {n}"
        )));
    }

    let offset = (m - 1) / 2;
    let out = (0..n)
        .map(|i| {
            // full[k] = sum_j x[j] * w[k - j]
            let k = i + offset;
            let j_lo = k.saturating_sub(m - 1);
            let j_hi = k.min(n - 1);
            (j_lo..=j_hi).map(|j| x[j] * w[k - j]).sum()
        })
        .collect();
    Ok(out)
}

/// Centred running mean over `n` samples.
///
/// # Errors
///
/// Fails when `n` is zero or longer than `x`.
pub fn running_mean(x: &[f64], n: usize) -> Result<Vec<f64>> {
    convolve_same(x, &boxcar_weights(n))
}
