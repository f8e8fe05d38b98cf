//! Principal axes and rotation of 2-D vector time series.
//!
//! Wind stress and current records are usually stored as eastward and
//! northward components. [`principal_axis`] finds the orientation along
//! which the variance of such a record is largest, and [`rotate`] expresses
//! the vectors in a rotated frame, e.g. cross-shore and alongshore.
//!
//! Reference: Emery and Thomson, *Data Analysis Methods in Physical
//! Oceanography*, 2nd ed., section 4.3.
//!
//! # Example
//!
//! ```
//! use oceanstats::{principal_axis, rotate};
//!
//! let u = [1.0, 2.0, -1.0, -2.0, 0.5];
//! let v = [1.0, 2.0, -1.0, -2.0, 0.4];
//!
//! let axes = principal_axis(&u, &v)?;
//! assert!((axes.theta - 45.0).abs() < 1.0);
//! assert!(axes.major >= axes.minor);
//!
//! // Align the major axis with the y component
//! let (_cross, _along) = rotate(&u, &v, -axes.theta - 90.0)?;
//! # Ok::<(), oceanstats::AnalysisError>(())
//! ```

use num_complex::Complex64;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_same_len, Result};
use crate::math::linalg::finite_covariance;

/// Orientation and spread of a 2-D vector time series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrincipalAxes {
    /// Angle of the major axis in degrees, math convention (east = 0,
    /// north = 90), in `(-90, 90]`. An axis, so only defined modulo 180.
    pub theta: f64,
    /// Standard deviation along the major axis.
    pub major: f64,
    /// Standard deviation along the minor axis.
    pub minor: f64,
    /// Number of finite `(u, v)` pairs used.
    pub n_used: usize,
}

impl PrincipalAxes {
    /// Unit vector along the major axis.
    #[must_use]
    pub fn major_axis(&self) -> [f64; 2] {
        let rad = self.theta.to_radians();
        [rad.cos(), rad.sin()]
    }

    /// Ratio `minor / major`: 0 for rectilinear motion, 1 for isotropic
    /// scatter. NaN when both deviations are zero.
    #[must_use]
    pub fn anisotropy(&self) -> f64 {
        self.minor / self.major
    }

    /// Rotation angle that maps the major axis onto the second (y) output
    /// component of [`rotate`].
    #[must_use]
    pub fn alongshore_rotation(&self) -> f64 {
        -self.theta - 90.0
    }
}

/// Principal axes of a vector time series given as components.
///
/// Pairs where either component is NaN or infinite are dropped before the
/// unbiased covariance matrix `C` is computed. Then
///
/// - `theta = 0.5 * atan2(2 C01, C00 - C11)` (degrees),
/// - `major, minor = sqrt((tr C ± sqrt((C00 - C11)^2 + 4 C01^2)) / 2)`.
///
/// For isotropic scatter (`C00 == C11`, `C01 == 0`) the direction is
/// meaningless; `atan2(0, 0)` makes `theta` come out as 0.
///
/// # Errors
///
/// Fails on unequal lengths or fewer than two finite pairs.
pub fn principal_axis(u: &[f64], v: &[f64]) -> Result<PrincipalAxes> {
    let (cov, n_used) = finite_covariance(u, v)?;
    if n_used < u.len() {
        debug!(
            dropped = u.len() - n_used,
            n_used, "principal_axis: excluded non-finite pairs"
        );
    }

    let (c00, c01, c11) = (cov[(0, 0)], cov[(0, 1)], cov[(1, 1)]);

    let mut theta = 0.5 * (2.0 * c01).atan2(c00 - c11).to_degrees();
    if theta <= -90.0 {
        theta += 180.0;
    }

    let term1 = c00 + c11;
    let term2 = ((c00 - c11).powi(2) + 4.0 * c01 * c01).sqrt();
    let major = (0.5 * (term1 + term2)).sqrt();
    // Rounding can push the smaller eigenvalue a hair below zero
    let minor = (0.5 * (term1 - term2)).max(0.0).sqrt();

    Ok(PrincipalAxes {
        theta,
        major,
        minor,
        n_used,
    })
}

/// Principal axes of a vector time series given as complex numbers `u + iv`.
///
/// # Errors
///
/// Fails when fewer than two finite vectors remain.
pub fn principal_axis_complex(w: &[Complex64]) -> Result<PrincipalAxes> {
    let (u, v): (Vec<f64>, Vec<f64>) = w.iter().map(|c| (c.re, c.im)).unzip();
    principal_axis(&u, &v)
}

/// Rotate vectors counter-clockwise by `theta` degrees.
///
/// Equivalently, express the same vectors in a coordinate frame rotated
/// clockwise by `theta`. `rotate(&[1.0], &[0.0], 90.0)` gives `(0, 1)`.
/// NaN components propagate.
///
/// # Errors
///
/// Fails when `u` and `v` have different lengths.
pub fn rotate(u: &[f64], v: &[f64], theta: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    ensure_same_len(u.len(), v.len())?;
    let turn = Complex64::from_polar(1.0, theta.to_radians());
    Ok(u.iter()
        .zip(v.iter())
        .map(|(&a, &b)| {
            let w = Complex64::new(a, b) * turn;
            (w.re, w.im)
        })
        .unzip())
}

/// Rotate complex vectors counter-clockwise by `theta` degrees.
#[must_use]
pub fn rotate_complex(w: &[Complex64], theta: f64) -> Vec<Complex64> {
    let turn = Complex64::from_polar(1.0, theta.to_radians());
    w.iter().map(|&c| c * turn).collect()
}

/// A vector series expressed along and across its principal axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NaturalCoordinates {
    /// Component across the major axis (x after rotation).
    pub cross_shore: Vec<f64>,
    /// Component along the major axis (y after rotation).
    pub alongshore: Vec<f64>,
    /// Axes the rotation was derived from.
    pub axes: PrincipalAxes,
}

/// Rotate a vector series so its major axis lies along the second component.
///
/// This is `rotate(u, v, -theta - 90)` with `theta` from [`principal_axis`],
/// the usual west-coast convention for alongshore wind stress.
///
/// # Errors
///
/// Fails under the same conditions as [`principal_axis`].
pub fn natural_coordinates(u: &[f64], v: &[f64]) -> Result<NaturalCoordinates> {
    let axes = principal_axis(u, v)?;
    let (cross_shore, alongshore) = rotate(u, v, axes.alongshore_rotation())?;
    Ok(NaturalCoordinates {
        cross_shore,
        alongshore,
        axes,
    })
}
