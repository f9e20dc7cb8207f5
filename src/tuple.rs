use std::ops::{ Add, Sub, Neg, Mul, Div };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A homogeneous 4D tuple.
///
/// Points carry `w == 1.0` and vectors carry `w == 0.0`. Subtracting two
/// points yields a vector; adding a vector to a point yields a point.
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        self.components().iter()
            .zip(other.components().iter())
            .all(|(a, b)| feq(*a, *b))
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D::tuple(x, y, z, 1.0)
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D::tuple(x, y, z, 0.0)
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    /// True if every component is neither infinite nor NaN.
    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|c| c.is_finite())
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Tuple4D {
        *self / self.magnitude()
    }

    pub fn dot(&self, other: &Tuple4D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    fn components(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Tuple4D {
        Tuple4D::tuple(f(self.x), f(self.y), f(self.z), f(self.w))
    }

    fn zip_with(self, other: Tuple4D, f: impl Fn(f64, f64) -> f64) -> Tuple4D {
        Tuple4D::tuple(f(self.x, other.x), f(self.y, other.y),
            f(self.z, other.z), f(self.w, other.w))
    }
}

impl Add for Tuple4D {
    type Output = Tuple4D;

    fn add(self, other: Tuple4D) -> Tuple4D {
        self.zip_with(other, |a, b| a + b)
    }
}

impl Sub for Tuple4D {
    type Output = Tuple4D;

    fn sub(self, other: Tuple4D) -> Tuple4D {
        self.zip_with(other, |a, b| a - b)
    }
}

impl Neg for Tuple4D {
    type Output = Tuple4D;

    fn neg(self) -> Tuple4D {
        self.map(|c| -c)
    }
}

/// Scalar right-multiplication.
///
/// ```
/// use ray_caster::tuple::Tuple4D;
///
/// let t = Tuple4D::tuple(1.0, 2.0, 3.0, 4.0);
/// assert_eq!(t * 5.0, Tuple4D::tuple(5.0, 10.0, 15.0, 20.0));
/// ```
impl Mul<f64> for Tuple4D {
    type Output = Tuple4D;

    fn mul(self, k: f64) -> Tuple4D {
        self.map(|c| c * k)
    }
}

/// Scalar left-multiplication, so `t * direction` reads like the math.
impl Mul<Tuple4D> for f64 {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        t * self
    }
}

/// Component-wise division by a scalar. Used for the perspective divide.
impl Div<f64> for Tuple4D {
    type Output = Tuple4D;

    fn div(self, k: f64) -> Tuple4D {
        self.map(|c| c / k)
    }
}

#[test]
fn far_minus_near_is_a_direction() {
    let near = Tuple4D::point(0.0, 0.0, 2.0);
    let far = Tuple4D::point(0.5, -1.0, -2.0);

    assert!((far - near).is_vector());
    assert_eq!(far - near, Tuple4D::vector(0.5, -1.0, -4.0));
}

#[test]
fn add_vector_to_point() {
    let p = Tuple4D::point(0.0, 0.0, 5.0);
    let v = Tuple4D::vector(0.0, 0.0, -1.0);

    assert_eq!(p + 4.0 * v, Tuple4D::point(0.0, 0.0, 1.0));
}

#[test]
fn negation_flips_every_component() {
    let a = Tuple4D::tuple(0.5, -2.0, 0.0, -1.0);

    assert_eq!(-a, Tuple4D::tuple(-0.5, 2.0, 0.0, 1.0));
}

#[test]
fn perspective_divide() {
    let a = Tuple4D::tuple(2.0, -4.0, 6.0, 2.0);

    assert_eq!(a / 2.0, Tuple4D::point(1.0, -2.0, 3.0));
}

#[test]
fn normalize_keeps_direction() {
    let v = Tuple4D::vector(0.0, 3.0, -4.0);

    assert_eq!(v.normalize(), Tuple4D::vector(0.0, 0.6, -0.8));
    assert!(feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn dot_includes_w() {
    let a = Tuple4D::point(1.0, 2.0, 3.0);
    let b = Tuple4D::tuple(2.0, 0.5, -1.0, 4.0);

    assert_eq!(a.dot(&b), 4.0);
}

#[test]
fn finite_check() {
    assert!(Tuple4D::point(1.0, 2.0, 3.0).is_finite());
    assert!(!Tuple4D::point(f64::NAN, 2.0, 3.0).is_finite());
    assert!(!(Tuple4D::point(1.0, 2.0, 3.0) / 0.0).is_finite());
}
