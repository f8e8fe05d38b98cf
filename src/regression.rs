//! Least-squares regression.
//!
//! [`linregress`] fits a straight line and reports the correlation and a
//! two-sided significance test for a non-zero slope. [`least_squares`]
//! solves a general linear model `y = X b` for any design matrix, e.g. a
//! line plus annual and semi-annual harmonics.

use nalgebra::{DMatrix, DVector, SVD};
use statrs::distribution::{ContinuousCDF, StudentsT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_same_len, AnalysisError, Result};

/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub rvalue: f64,
    /// Two-sided p-value for the null hypothesis of zero slope (t-test with
    /// `n - 2` degrees of freedom).
    pub pvalue: f64,
    /// Standard error of the slope.
    pub stderr: f64,
    /// Standard error of the intercept.
    pub intercept_stderr: f64,
    /// Number of points.
    pub n: usize,
}

impl LinearFit {
    /// Coefficient of determination `r^2`.
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        self.rvalue * self.rvalue
    }

    /// Evaluate the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a straight line to `(x, y)`.
///
/// # Errors
///
/// Fails on unequal lengths, fewer than three points, or constant `x`.
///
/// # Example
///
/// ```
/// use oceanstats::linregress;
///
/// let fit = linregress(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0])?;
/// assert!((fit.slope - 0.6).abs() < 1e-12);
/// assert!((fit.intercept - 2.2).abs() < 1e-12);
/// # Ok::<(), oceanstats::AnalysisError>(())
/// ```
pub fn linregress(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    ensure_same_len(x.len(), y.len())?;
    let n = x.len();
    if n < 3 {
        return Err(AnalysisError::insufficient_data(3, n));
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return Err(AnalysisError::invalid_input(
            "x has zero variance; slope is undefined",
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let rvalue = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };

    let df = nf - 2.0;
    let one_minus_r2 = (1.0 - rvalue) * (1.0 + rvalue);
    let pvalue = if one_minus_r2 <= 0.0 {
        0.0
    } else {
        let t = rvalue * (df / one_minus_r2).sqrt();
        let dist =
            StudentsT::new(0.0, 1.0, df).map_err(|e| AnalysisError::statistics(e.to_string()))?;
        2.0 * (1.0 - dist.cdf(t.abs()))
    };

    let stderr = (one_minus_r2.max(0.0) * syy / sxx / df).sqrt();
    let mean_x2 = x.iter().map(|a| a * a).sum::<f64>() / nf;
    let intercept_stderr = stderr * mean_x2.sqrt();

    Ok(LinearFit {
        slope,
        intercept,
        rvalue,
        pvalue,
        stderr,
        intercept_stderr,
        n,
    })
}

/// Solution of a general linear least-squares problem.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeastSquaresFit {
    /// One coefficient per design-matrix column.
    pub coefficients: Vec<f64>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
}

impl LeastSquaresFit {
    /// Fraction of the variance of `y` explained by the model.
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        let n = self.fitted.len() as f64;
        let y = self.fitted.iter().zip(self.residuals.iter()).map(|(f, r)| f + r);
        let mean = y.clone().sum::<f64>() / n;
        let tss: f64 = y.map(|v| (v - mean).powi(2)).sum();
        if tss == 0.0 {
            return 1.0;
        }
        1.0 - self.rss / tss
    }
}

/// Solve `min |y - X b|^2` for the design matrix `X` (one row per
/// observation) via SVD.
///
/// # Errors
///
/// Fails when the row count differs from `y.len()`, when there are fewer
/// observations than columns, or when the SVD solve fails.
pub fn least_squares(design: &DMatrix<f64>, y: &[f64]) -> Result<LeastSquaresFit> {
    let (rows, cols) = design.shape();
    ensure_same_len(rows, y.len())?;
    if cols == 0 {
        return Err(AnalysisError::invalid_input("design matrix has no columns"));
    }
    if rows < cols {
        return Err(AnalysisError::insufficient_data(cols, rows));
    }

    let svd = SVD::new(design.clone(), true, true);
    let target = DVector::from_row_slice(y);
    let beta = svd.solve(&target, 1e-12).map_err(AnalysisError::linalg)?;
    let fitted = design * &beta;

    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(a, f)| a - f).collect();
    let rss = residuals.iter().map(|r| r * r).sum();

    Ok(LeastSquaresFit {
        coefficients: beta.iter().copied().collect(),
        fitted: fitted.iter().copied().collect(),
        residuals,
        rss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const X: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
    const Y: [f64; 5] = [2.0, 4.0, 5.0, 4.0, 5.0];

    #[test]
    fn test_linregress_reference_values() {
        let fit = linregress(&X, &Y).unwrap();
        assert_eq!(fit.n, 5);
        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-12);
        assert_relative_eq!(fit.rvalue, 0.774_596_669_241_483_4, epsilon = 1e-12);
        assert_relative_eq!(fit.pvalue, 0.124_027_062_656_967_7, epsilon = 1e-6);
        assert_relative_eq!(fit.stderr, 0.282_842_712_474_619, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept_stderr, 0.938_083_151_964_685_7, epsilon = 1e-12);
        assert_relative_eq!(fit.r_squared(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.predict(10.0), 8.2, epsilon = 1e-12);
    }

    #[test]
    fn test_linregress_perfect_line() {
        let y: Vec<f64> = X.iter().map(|x| 1.0 - 2.0 * x).collect();
        let fit = linregress(&X, &y).unwrap();
        assert_relative_eq!(fit.slope, -2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.rvalue, -1.0, epsilon = 1e-12);
        assert!(fit.pvalue < 1e-6);
        assert_relative_eq!(fit.stderr, 0.0, epsilon = 1e-7);
    }

    #[test]
    fn test_linregress_flat_response() {
        let fit = linregress(&X, &[3.0; 5]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.rvalue, 0.0);
        assert_relative_eq!(fit.pvalue, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linregress_errors() {
        assert_eq!(
            linregress(&[1.0, 2.0], &[1.0, 2.0]),
            Err(AnalysisError::InsufficientData { min: 3, actual: 2 })
        );
        assert_eq!(
            linregress(&X, &Y[..4]),
            Err(AnalysisError::LengthMismatch { left: 5, right: 4 })
        );
        assert!(matches!(
            linregress(&[2.0; 4], &[1.0, 2.0, 3.0, 4.0]),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_least_squares_matches_linregress() {
        let design = DMatrix::from_fn(5, 2, |i, j| if j == 0 { 1.0 } else { X[i] });
        let fit = least_squares(&design, &Y).unwrap();
        let line = linregress(&X, &Y).unwrap();
        assert_relative_eq!(fit.coefficients[0], line.intercept, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], line.slope, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared(), line.r_squared(), epsilon = 1e-10);
        assert_relative_eq!(fit.residuals.iter().sum::<f64>(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_least_squares_harmonic_model() {
        use std::f64::consts::PI;
        // Trend plus an annual cycle, monthly samples
        let t: Vec<f64> = (0..48).map(|i| i as f64 / 12.0).collect();
        let y: Vec<f64> = t
            .iter()
            .map(|&ti| 10.0 + 0.5 * ti + 2.0 * (2.0 * PI * ti).cos() - (2.0 * PI * ti).sin())
            .collect();
        let design = DMatrix::from_fn(t.len(), 4, |i, j| match j {
            0 => 1.0,
            1 => t[i],
            2 => (2.0 * PI * t[i]).cos(),
            _ => (2.0 * PI * t[i]).sin(),
        });
        let fit = least_squares(&design, &y).unwrap();
        let expected = [10.0, 0.5, 2.0, -1.0];
        for (c, e) in fit.coefficients.iter().zip(expected.iter()) {
            assert_relative_eq!(c, e, epsilon = 1e-9);
        }
        assert!(fit.rss < 1e-16);
    }

    #[test]
    fn test_least_squares_errors() {
        let design = DMatrix::from_element(2, 3, 1.0);
        assert!(matches!(
            least_squares(&design, &[1.0, 2.0]),
            Err(AnalysisError::InsufficientData { min: 3, actual: 2 })
        ));
        let design = DMatrix::from_element(4, 2, 1.0);
        assert!(matches!(
            least_squares(&design, &[1.0, 2.0]),
            Err(AnalysisError::LengthMismatch { .. })
        ));
    }
}
