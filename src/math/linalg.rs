//! Linear algebra utilities for vector time series.
//!
//! Sample covariance of 2-D vectors, using nalgebra. The general symmetric
//! eigendecomposition is kept for cross-checking the closed-form principal
//! axes in tests.

use nalgebra::Matrix2;
#[cfg(test)]
use nalgebra::{SymmetricEigen, Vector2};

use crate::error::{ensure_same_len, AnalysisError, Result};

/// Unbiased covariance of the pairs where both components are finite.
///
/// Returns the covariance matrix together with the number of pairs used.
///
/// # Errors
///
/// Fails on unequal lengths or when fewer than two finite pairs remain.
pub fn finite_covariance(u: &[f64], v: &[f64]) -> Result<(Matrix2<f64>, usize)> {
    ensure_same_len(u.len(), v.len())?;

    let pairs: Vec<(f64, f64)> = u
        .iter()
        .zip(v.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return Err(AnalysisError::insufficient_data(2, n));
    }

    let mean_u = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_v = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let mut suu = 0.0;
    let mut svv = 0.0;
    let mut suv = 0.0;
    for &(a, b) in &pairs {
        let du = a - mean_u;
        let dv = b - mean_v;
        suu += du * du;
        svv += dv * dv;
        suv += du * dv;
    }

    let denom = (n - 1) as f64;
    let cov = Matrix2::new(suu / denom, suv / denom, suv / denom, svv / denom);
    Ok((cov, n))
}

/// Eigenvalues and eigenvectors of a symmetric 2x2 matrix, sorted so the
/// largest eigenvalue comes first.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Eigen2 {
    /// Eigenvalues in descending order.
    pub values: [f64; 2],
    /// Unit eigenvectors matching `values`.
    pub vectors: [[f64; 2]; 2],
}

/// Symmetric eigendecomposition of a 2x2 matrix.
#[cfg(test)]
pub(crate) fn symmetric_eigen(matrix: &Matrix2<f64>) -> Eigen2 {
    let eigen = SymmetricEigen::new(*matrix);

    let mut pairs: Vec<(f64, Vector2<f64>)> = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .map(|(i, &value)| (value, eigen.eigenvectors.column(i).into_owned()))
        .collect();

    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    Eigen2 {
        values: [pairs[0].0, pairs[1].0],
        vectors: [
            [pairs[0].1[0], pairs[0].1[1]],
            [pairs[1].1[0], pairs[1].1[1]],
        ],
    }
}
