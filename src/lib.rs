pub mod consts;
pub mod error;

pub mod tuple;
pub mod matrix;
pub mod ray;

pub mod geometry;
pub mod intersect;
pub mod view;
pub mod camera;
pub mod world;

pub mod color;
pub mod canvas;

pub mod parallel;

use crate::consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}

/// Compares two floats for near-equality.
///
/// Exact equality always passes. When either operand is zero a relative error
/// is meaningless, so the absolute difference is compared against
/// `epsilon * epsilon` instead. Otherwise the relative difference
/// `|a - b| / (|a| + |b|)` is compared against `epsilon`.
///
/// ```
/// # use ray_caster::near;
/// assert!(near(1e-15, 0.0, 1e-7));
/// assert!(!near(1e-10, 0.0, 1e-7));
/// assert!(!near(1.0, 1.5, 0.1));
/// ```
pub fn near(a: f64, b: f64, epsilon: f64) -> bool {
    let diff = (a - b).abs();

    if a == b {
        true
    } else if a * b == 0.0 {
        diff < epsilon * epsilon
    } else {
        diff / (a.abs() + b.abs()) < epsilon
    }
}

#[test]
fn near_zeros() {
    for eps in [1e-12, 1e-7, 0.5, 10.0] {
        assert!(near(0.0, 0.0, eps));
    }
}

#[test]
fn near_tiny_against_zero() {
    // Against zero the tolerance is epsilon squared, here 1e-14
    assert!(near(1e-15, 0.0, 1e-7));
    assert!(near(0.0, -1e-15, 1e-7));

    assert!(!near(1e-10, 0.0, 1e-7));
    assert!(!near(0.0, 1e-10, 1e-7));
    assert!(!near(1e-7, 0.0, 1e-7));
}

#[test]
fn near_relative() {
    assert!(!near(1.0, 1.5, 0.1));
    assert!(near(1000.0, 1000.0001, 1e-7));
    assert!(near(-2.0, -2.0000000001, 1e-7));
}

#[test]
fn near_symmetric() {
    let pairs = [
        (0.0, 1e-10),
        (1e-10, 0.0),
        (0.0, 1e-15),
        (1.0, 1.5),
        (3.0, -3.0),
        (1e-3, 2e-3),
        (5.0, 5.0000001),
    ];

    for (a, b) in pairs {
        for eps in [1e-7, 0.1, 0.5] {
            assert_eq!(near(a, b, eps), near(b, a, eps));
        }
    }
}
