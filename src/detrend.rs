//! Trend removal for scalar time series.
//!
//! Spectral estimates leak power from a trend into every low-frequency bin.
//! This module provides:
//! - Mean removal
//! - Linear detrending (closed-form least squares against sample index)
//! - Polynomial detrending (SVD solve of the Vandermonde system)

use nalgebra::{DMatrix, DVector, SVD};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Detrend;
use crate::error::{AnalysisError, Result};

/// Result of a trend fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrendFit {
    /// Polynomial coefficients in increasing degree: `[intercept, slope, ...]`.
    pub coefficients: Vec<f64>,
    /// Fitted trend at each sample.
    pub trend: Vec<f64>,
    /// Input minus trend.
    pub detrended: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
}

impl TrendFit {
    fn from_trend(x: &[f64], coefficients: Vec<f64>, trend: Vec<f64>) -> Self {
        let detrended: Vec<f64> = x.iter().zip(trend.iter()).map(|(a, t)| a - t).collect();
        let rss = detrended.iter().map(|d| d * d).sum();
        Self {
            coefficients,
            trend,
            detrended,
            rss,
        }
    }

    /// Intercept of the fit.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.coefficients.first().copied().unwrap_or(0.0)
    }

    /// Slope per sample (zero for a mean fit).
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.coefficients.get(1).copied().unwrap_or(0.0)
    }
}

/// Subtract the mean.
#[must_use]
pub fn detrend_mean(x: &[f64]) -> TrendFit {
    if x.is_empty() {
        return TrendFit::from_trend(x, vec![0.0], Vec::new());
    }
    let mean = x.iter().sum::<f64>() / x.len() as f64;
    TrendFit::from_trend(x, vec![mean], vec![mean; x.len()])
}

/// Subtract the least-squares line fitted against sample index `0..n`.
#[must_use]
pub fn detrend_linear(x: &[f64]) -> TrendFit {
    let m = x.len();
    if m < 2 {
        return detrend_mean(x);
    }

    let mean_t = (m - 1) as f64 / 2.0;
    let mean_y = x.iter().sum::<f64>() / m as f64;
    let mut ss_t = 0.0;
    let mut sp = 0.0;
    for (j, &y) in x.iter().enumerate() {
        let dt = j as f64 - mean_t;
        ss_t += dt * dt;
        sp += dt * (y - mean_y);
    }
    let slope = sp / ss_t;
    let intercept = mean_y - slope * mean_t;

    let trend: Vec<f64> = (0..m).map(|j| intercept + slope * j as f64).collect();
    TrendFit::from_trend(x, vec![intercept, slope], trend)
}

/// Subtract the least-squares polynomial of `degree` fitted against sample
/// index.
///
/// The index is rescaled to `[-1, 1]` before building the Vandermonde matrix
/// to keep the system well conditioned; returned coefficients refer to that
/// rescaled index.
///
/// # Errors
///
/// Fails when the record has no more samples than coefficients or the SVD
/// solve fails.
pub fn detrend_polynomial(x: &[f64], degree: usize) -> Result<TrendFit> {
    let m = x.len();
    let n_coef = degree + 1;
    if m <= n_coef {
        return Err(AnalysisError::insufficient_data(n_coef + 1, m));
    }

    let half = (m - 1) as f64 / 2.0;
    let design = DMatrix::from_fn(m, n_coef, |j, k| ((j as f64 - half) / half).powi(k as i32));

    let svd = SVD::new(design.clone(), true, true);
    let y = DVector::from_row_slice(x);
    let beta = svd.solve(&y, 1e-10).map_err(AnalysisError::linalg)?;
    let fitted = &design * &beta;

    Ok(TrendFit::from_trend(
        x,
        beta.iter().copied().collect(),
        fitted.iter().copied().collect(),
    ))
}

/// Apply the configured detrending and return the detrended record.
#[must_use]
pub fn apply(x: &[f64], method: Detrend) -> Vec<f64> {
    match method {
        Detrend::None => x.to_vec(),
        Detrend::Mean => detrend_mean(x).detrended,
        Detrend::Linear => detrend_linear(x).detrended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_detrend_linear_exact_line() {
        let x: Vec<f64> = (0..20).map(|i| 3.0 + 0.5 * i as f64).collect();
        let fit = detrend_linear(&x);
        assert_relative_eq!(fit.intercept(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(fit.slope(), 0.5, epsilon = 1e-12);
        assert!(fit.detrended.iter().all(|d| d.abs() < 1e-12));
        assert!(fit.rss < 1e-20);
    }

    #[test]
    fn test_detrend_linear_residuals_are_orthogonal() {
        let x: Vec<f64> = (0..30)
            .map(|i| (i as f64 * 0.9).sin() + 0.1 * i as f64)
            .collect();
        let fit = detrend_linear(&x);
        let sum: f64 = fit.detrended.iter().sum();
        let weighted: f64 = fit
            .detrended
            .iter()
            .enumerate()
            .map(|(j, d)| j as f64 * d)
            .sum();
        assert_relative_eq!(sum, 0.0, epsilon = 1e-10);
        assert_relative_eq!(weighted, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_detrend_mean() {
        let fit = detrend_mean(&[1.0, 2.0, 6.0]);
        assert_relative_eq!(fit.intercept(), 3.0);
        assert_eq!(fit.slope(), 0.0);
        assert_eq!(fit.detrended, vec![-2.0, -1.0, 3.0]);
    }

    #[test]
    fn test_short_records() {
        assert!(detrend_mean(&[]).detrended.is_empty());
        let fit = detrend_linear(&[4.0]);
        assert_eq!(fit.detrended, vec![0.0]);
    }

    #[test]
    fn test_detrend_polynomial_quadratic() {
        let x: Vec<f64> = (0..40)
            .map(|i| {
                let t = i as f64;
                1.0 - 0.2 * t + 0.03 * t * t
            })
            .collect();
        let fit = detrend_polynomial(&x, 2).unwrap();
        assert_eq!(fit.coefficients.len(), 3);
        assert!(fit.detrended.iter().all(|d| d.abs() < 1e-8));
        for (a, b) in fit.trend.iter().zip(x.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_detrend_polynomial_degree_one_matches_linear() {
        let x: Vec<f64> = (0..25).map(|i| ((i * 7) % 5) as f64 + 0.3 * i as f64).collect();
        let poly = detrend_polynomial(&x, 1).unwrap();
        let lin = detrend_linear(&x);
        for (a, b) in poly.detrended.iter().zip(lin.detrended.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_detrend_polynomial_too_short() {
        assert!(matches!(
            detrend_polynomial(&[1.0, 2.0, 3.0], 2),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_apply() {
        let x = [1.0, 2.0, 3.0, 5.0];
        assert_eq!(apply(&x, Detrend::None), x.to_vec());
        assert_relative_eq!(apply(&x, Detrend::Mean).iter().sum::<f64>(), 0.0);
        let lin = apply(&x, Detrend::Linear);
        assert_eq!(lin, detrend_linear(&x).detrended);
    }
}
