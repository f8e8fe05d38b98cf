//! Power spectral density estimation.
//!
//! This module provides the raw [`periodogram`] and its smoothed
//! generalization [`welch_psd`], together with chi-squared confidence
//! intervals for the resulting estimates.
//!
//! # Normalization
//!
//! All one-sided estimates use the density convention
//!
//! ```text
//! P_k = c_k |X_k|^2 / (fs * sum(w^2))
//! ```
//!
//! where `w` is the segment window and `c_k = 2` except at zero frequency and
//! at the Nyquist bin of an even-length segment, which have no mirrored
//! negative-frequency partner. With a rectangular window the interior bins
//! are `(2 dt / N) |X_k|^2`, and `sum(P_k) * df` equals the mean square of the
//! (detrended, windowed) input.
//!
//! # Example
//!
//! ```
//! use oceanstats::{periodogram, welch_psd, WelchConfig, WindowFunction};
//! use std::f64::consts::PI;
//!
//! // Hourly samples of a 2 cycle-per-day oscillation, frequencies in cpd
//! let fs = 24.0;
//! let x: Vec<f64> = (0..480)
//!     .map(|i| (2.0 * PI * 2.0 * i as f64 / fs).cos())
//!     .collect();
//!
//! let raw = periodogram(&x, fs)?;
//! let (f_peak, _) = raw.peak().unwrap();
//! assert!((f_peak - 2.0).abs() < 1e-9);
//!
//! let config = WelchConfig::segmented(120).with_window(WindowFunction::Hamming);
//! let smooth = welch_psd(&x, fs, &config)?;
//! assert!(smooth.dof > raw.dof);
//! # Ok::<(), oceanstats::AnalysisError>(())
//! ```

use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{WelchConfig, WindowFunction};
use crate::detrend;
use crate::error::{AnalysisError, Result};
use crate::iter_maybe_parallel;
use crate::math::fft::{fftfreq, rfftfreq, RealFft};
use crate::math::window::{periodic_window, window_energy};

/// One-sided power spectral density estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spectrum {
    /// Frequencies `k * fs / segment_length`, from 0 up to Nyquist.
    pub frequencies: Vec<f64>,
    /// Power spectral density at each frequency (variance per unit
    /// frequency).
    pub psd: Vec<f64>,
    /// Sampling rate of the input (samples per unit time).
    pub sampling_rate: f64,
    /// Samples per averaged segment.
    pub segment_length: usize,
    /// Number of averaged segments.
    pub segments: usize,
    /// Window applied to each segment.
    pub window: WindowFunction,
    /// Equivalent degrees of freedom of each estimate. Overlapping segments
    /// are correlated and count for less than two each.
    pub dof: f64,
}

impl Spectrum {
    /// Number of frequency bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.psd.len()
    }

    /// Whether the spectrum has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.psd.is_empty()
    }

    /// Frequency spacing `fs / segment_length`.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.sampling_rate / self.segment_length as f64
    }

    /// Integrated power `sum(psd) * df`.
    #[must_use]
    pub fn total_power(&self) -> f64 {
        self.psd.iter().sum::<f64>() * self.resolution()
    }

    /// Frequency and PSD of the strongest bin above zero frequency.
    #[must_use]
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(self.psd.iter())
            .skip(1)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(&f, &p)| (f, p))
    }

    /// Confidence interval for the true spectrum at `level` (e.g. 0.95),
    /// using this estimate's degrees of freedom.
    ///
    /// # Errors
    ///
    /// Fails if `level` is outside `(0, 1)`.
    pub fn confidence_interval(&self, level: f64) -> Result<ConfidenceInterval> {
        confidence_interval(self.dof, level)
    }
}

/// Multiplicative chi-squared bounds for a spectral estimate.
///
/// The true spectrum `S` lies within `lower * S_est <= S <= upper * S_est`
/// with the requested confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfidenceInterval {
    /// Confidence level, e.g. 0.95.
    pub level: f64,
    /// Degrees of freedom the bounds were computed for.
    pub dof: f64,
    /// `dof / chi2(1 - alpha/2, dof)`.
    pub lower: f64,
    /// `dof / chi2(alpha/2, dof)`.
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Lower and upper PSD bands for an estimate.
    #[must_use]
    pub fn apply(&self, psd: &[f64]) -> (Vec<f64>, Vec<f64>) {
        (
            psd.iter().map(|p| p * self.lower).collect(),
            psd.iter().map(|p| p * self.upper).collect(),
        )
    }

    /// Width of the interval in `log10` units, the same at every frequency
    /// on a log-log plot.
    #[must_use]
    pub fn log10_width(&self) -> f64 {
        self.upper.log10() - self.lower.log10()
    }
}

/// Chi-squared confidence interval for a spectral estimate with `dof`
/// degrees of freedom.
///
/// # Errors
///
/// Fails if `level` is outside `(0, 1)` or `dof` is not positive.
pub fn confidence_interval(dof: f64, level: f64) -> Result<ConfidenceInterval> {
    if !(level > 0.0 && level < 1.0) {
        return Err(AnalysisError::invalid_config(format!(
            "confidence level must be in (0, 1), got {level}"
        )));
    }
    let chi2 = ChiSquared::new(dof).map_err(|e| AnalysisError::statistics(e.to_string()))?;
    let alpha = 1.0 - level;
    Ok(ConfidenceInterval {
        level,
        dof,
        lower: dof / chi2.inverse_cdf(1.0 - alpha / 2.0),
        upper: dof / chi2.inverse_cdf(alpha / 2.0),
    })
}

fn validate_record(x: &[f64], fs: f64) -> Result<()> {
    if !(fs.is_finite() && fs > 0.0) {
        return Err(AnalysisError::invalid_config(format!(
            "sampling rate must be positive and finite, got {fs}"
        )));
    }
    if x.len() < 2 {
        return Err(AnalysisError::insufficient_data(2, x.len()));
    }
    if x.iter().any(|v| !v.is_finite()) {
        warn!(
            n = x.len(),
            "spectral estimate received non-finite samples; output will be NaN"
        );
    }
    Ok(())
}

/// Raw one-sided periodogram of `x` sampled at `fs`.
///
/// No detrending and no window. A constant record puts all of its power in
/// the zero-frequency bin.
///
/// # Errors
///
/// Fails for fewer than two samples or a non-positive sampling rate.
pub fn periodogram(x: &[f64], fs: f64) -> Result<Spectrum> {
    validate_record(x, fs)?;
    let n = x.len();

    let fft = RealFft::new(n);
    let scale = 1.0 / (fs * n as f64);
    let psd: Vec<f64> = fft
        .one_sided_power(x, &vec![1.0; n])
        .into_iter()
        .map(|p| p * scale)
        .collect();

    Ok(Spectrum {
        frequencies: rfftfreq(n, 1.0 / fs),
        psd,
        sampling_rate: fs,
        segment_length: n,
        segments: 1,
        window: WindowFunction::Boxcar,
        dof: 2.0,
    })
}

/// Unrestricted two-sided periodogram `P_k = dt |X_k|^2 / N` over all `N`
/// bins, with frequencies in FFT order (zero, positive, then negative).
///
/// `sum(P_k) * df` over `k >= 1` equals the population variance of `x`.
///
/// # Errors
///
/// Fails for fewer than two samples or a non-positive sampling rate.
pub fn periodogram_two_sided(x: &[f64], fs: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    validate_record(x, fs)?;
    let n = x.len();
    let dt = 1.0 / fs;

    let spectrum = RealFft::new(n).forward(x);
    let psd = spectrum
        .iter()
        .map(|c| c.norm_sqr() * dt / n as f64)
        .collect();

    Ok((fftfreq(n, dt), psd))
}

/// Equivalent degrees of freedom of a Welch average of `segments` windowed
/// segments taken every `step` samples.
///
/// ```text
/// dof = 2K / (1 + 2 sum_{m=1}^{K-1} (1 - m/K) rho(m * step)^2)
/// rho(s) = sum_t w_t w_{t+s} / sum_t w_t^2
/// ```
///
/// Disjoint segments give `2K` for any window; a single segment gives 2.
#[must_use]
pub fn equivalent_dof(window: &[f64], step: usize, segments: usize) -> f64 {
    let k = segments as f64;
    let energy = window_energy(window);
    let mut denom = 1.0;
    for m in 1..segments {
        let shift = m * step;
        if shift >= window.len() || energy == 0.0 {
            break;
        }
        let rho = window
            .iter()
            .zip(&window[shift..])
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / energy;
        denom += 2.0 * (1.0 - m as f64 / k) * rho * rho;
    }
    2.0 * k / denom
}

/// Welch's averaged, windowed periodogram.
///
/// The record is detrended as configured, cut into segments of
/// `segment_length` samples overlapping by `overlap` samples (a trailing
/// remainder shorter than a segment is dropped), each segment is tapered with
/// the window, and the one-sided periodograms are averaged bin by bin. The
/// normalization divides by the window energy so the expected level of the
/// estimate does not depend on the window.
///
/// Averaging `K` independent segments lowers the variance of each estimate
/// by about `K` at the cost of a coarser resolution `fs / segment_length`.
/// Overlapping segments are correlated, so the reported degrees of freedom
/// follow Welch's equivalent-dof formula (see [`equivalent_dof`]).
///
/// # Errors
///
/// Fails for fewer than two samples, a non-positive sampling rate, a segment
/// longer than the record, or an invalid segment/overlap configuration.
pub fn welch_psd(x: &[f64], fs: f64, config: &WelchConfig) -> Result<Spectrum> {
    validate_record(x, fs)?;
    let n = x.len();
    let (segment_length, overlap) = config.resolve(n)?;
    let step = segment_length - overlap;
    let segments = 1 + (n - segment_length) / step;

    let data = detrend::apply(x, config.detrend);
    let window = periodic_window(segment_length, config.window);
    let scale = 1.0 / (fs * window_energy(&window));
    let fft = RealFft::new(segment_length);

    debug!(
        n,
        segment_length,
        overlap,
        segments,
        window = %config.window,
        "welch_psd: segmenting record"
    );

    let per_segment: Vec<Vec<f64>> = iter_maybe_parallel!(0..segments)
        .map(|s| {
            let start = s * step;
            fft.one_sided_power(&data[start..start + segment_length], &window)
        })
        .collect();

    let n_freq = segment_length / 2 + 1;
    let mut psd = vec![0.0; n_freq];
    for power in &per_segment {
        for (acc, p) in psd.iter_mut().zip(power.iter()) {
            *acc += p;
        }
    }
    let norm = scale / segments as f64;
    for p in &mut psd {
        *p *= norm;
    }

    let dof = equivalent_dof(&window, step, segments);
    debug!(dof, "welch_psd: averaged segments");

    Ok(Spectrum {
        frequencies: rfftfreq(segment_length, 1.0 / fs),
        psd,
        sampling_rate: fs,
        segment_length,
        segments,
        window: config.window,
        dof,
    })
}
