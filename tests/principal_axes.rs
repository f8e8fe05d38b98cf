//! Principal-axis and rotation tests on synthetic vector records.

use oceanstats::{
    natural_coordinates, principal_axis, principal_axis_complex, rotate, AnalysisError,
};
use num_complex::Complex64;
use rand::prelude::*;
use rand_distr::Normal;

// =============================================================================
// RECORD GENERATORS
// =============================================================================

/// Gaussian scatter with standard deviations `major` along `theta_deg` and
/// `minor` across it.
fn generate_ellipse(
    n: usize,
    theta_deg: f64,
    major: f64,
    minor: f64,
    seed: u64,
) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let (s, c) = theta_deg.to_radians().sin_cos();
    (0..n)
        .map(|_| {
            let a = major * normal.sample(&mut rng);
            let b = minor * normal.sample(&mut rng);
            (a * c - b * s, a * s + b * c)
        })
        .unzip()
}

fn sample_cov(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / (n - 1.0)
}

/// Difference between two axis orientations, modulo 180 degrees.
fn axis_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(180.0);
    d.min(180.0 - d)
}

// =============================================================================
// PRINCIPAL AXES
// =============================================================================

#[test]
fn test_recovers_wind_ellipse() {
    let (u, v) = generate_ellipse(5000, 35.0, 5.0, 1.0, 42);
    let axes = principal_axis(&u, &v).unwrap();

    assert!(axis_difference(axes.theta, 35.0) < 2.0, "theta = {}", axes.theta);
    assert!((axes.major - 5.0).abs() < 0.25, "major = {}", axes.major);
    assert!((axes.minor - 1.0).abs() < 0.05, "minor = {}", axes.minor);
    assert_eq!(axes.n_used, 5000);
}

#[test]
fn test_theta_range_all_quadrants() {
    for (i, &angle) in [-170.0, -95.0, -60.0, 0.0, 45.0, 89.0, 90.0, 135.0, 200.0]
        .iter()
        .enumerate()
    {
        let (u, v) = generate_ellipse(2000, angle, 3.0, 0.3, i as u64);
        let axes = principal_axis(&u, &v).unwrap();
        assert!(axes.theta > -90.0 && axes.theta <= 90.0);
        assert!(axes.major >= axes.minor && axes.minor >= 0.0);
        assert!(
            axis_difference(axes.theta, angle) < 2.0,
            "input {angle}, theta {}",
            axes.theta
        );
    }
}

#[test]
fn test_variance_is_conserved() {
    let (u, v) = generate_ellipse(1000, -50.0, 2.0, 0.7, 7);
    let axes = principal_axis(&u, &v).unwrap();
    let total = sample_cov(&u, &u) + sample_cov(&v, &v);
    assert!((axes.major.powi(2) + axes.minor.powi(2) - total).abs() < 1e-10 * total);
}

#[test]
fn test_gaps_are_dropped_pairwise() {
    let (mut u, mut v) = generate_ellipse(600, 10.0, 1.5, 0.5, 3);
    let clean = principal_axis(&u, &v).unwrap();

    let (mut u_kept, mut v_kept) = (Vec::new(), Vec::new());
    for i in 0..u.len() {
        match i % 10 {
            3 => u[i] = f64::NAN,
            7 => v[i] = f64::NAN,
            _ => {
                u_kept.push(u[i]);
                v_kept.push(v[i]);
            }
        }
    }

    let gappy = principal_axis(&u, &v).unwrap();
    let reference = principal_axis(&u_kept, &v_kept).unwrap();
    assert_eq!(gappy, reference);
    assert_eq!(gappy.n_used, 480);
    assert!(axis_difference(gappy.theta, clean.theta) < 5.0);
}

#[test]
fn test_isotropic_scatter() {
    let u = [1.0, -1.0, 0.0, 0.0];
    let v = [0.0, 0.0, 1.0, -1.0];
    let axes = principal_axis(&u, &v).unwrap();
    assert_eq!(axes.theta, 0.0);
    assert!((axes.major - axes.minor).abs() < 1e-12);
    assert!((axes.anisotropy() - 1.0).abs() < 1e-12);
}

#[test]
fn test_complex_input_matches_components() {
    let (u, v) = generate_ellipse(300, 70.0, 1.0, 0.2, 11);
    let w: Vec<Complex64> = u.iter().zip(v.iter()).map(|(&a, &b)| Complex64::new(a, b)).collect();
    assert_eq!(
        principal_axis_complex(&w).unwrap(),
        principal_axis(&u, &v).unwrap()
    );
}

#[test]
fn test_error_cases() {
    assert_eq!(
        principal_axis(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
        Err(AnalysisError::LengthMismatch { left: 3, right: 2 })
    );
    assert!(matches!(
        principal_axis(&[f64::NAN, 1.0, 2.0], &[0.0, f64::NAN, f64::INFINITY]),
        Err(AnalysisError::InsufficientData { .. })
    ));
    assert!(principal_axis(&[], &[]).is_err());
}

// =============================================================================
// ROTATION
// =============================================================================

#[test]
fn test_rotation_round_trip() {
    let (u, v) = generate_ellipse(200, 25.0, 1.0, 0.5, 5);
    let (ur, vr) = rotate(&u, &v, 63.0).unwrap();
    let (ub, vb) = rotate(&ur, &vr, -63.0).unwrap();
    for i in 0..u.len() {
        assert!((ub[i] - u[i]).abs() < 1e-12);
        assert!((vb[i] - v[i]).abs() < 1e-12);
        // Speed is unchanged
        assert!((ur[i].hypot(vr[i]) - u[i].hypot(v[i])).abs() < 1e-12);
    }
}

#[test]
fn test_natural_coordinates_decorrelate() {
    let (u, v) = generate_ellipse(3000, 120.0, 4.0, 1.0, 9);
    let frame = natural_coordinates(&u, &v).unwrap();

    let var_along = sample_cov(&frame.alongshore, &frame.alongshore);
    let var_cross = sample_cov(&frame.cross_shore, &frame.cross_shore);
    let cross_cov = sample_cov(&frame.alongshore, &frame.cross_shore);

    assert!((var_along - frame.axes.major.powi(2)).abs() < 1e-9 * var_along);
    assert!((var_cross - frame.axes.minor.powi(2)).abs() < 1e-9 * var_along);
    assert!(cross_cov.abs() < 1e-9 * var_along);

    // The rotated record has its major axis on the y component
    let rotated = principal_axis(&frame.cross_shore, &frame.alongshore).unwrap();
    assert!(axis_difference(rotated.theta, 90.0) < 1e-6);
}

#[test]
fn test_rotation_propagates_gaps() {
    let (u, v) = rotate(&[1.0, f64::NAN], &[0.0, 1.0], 30.0).unwrap();
    assert!(u[0].is_finite() && v[0].is_finite());
    assert!(u[1].is_nan() && v[1].is_nan());
}
