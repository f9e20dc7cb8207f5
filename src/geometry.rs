use serde::{ Serialize, Deserialize };

use crate::tuple::Tuple4D;

/// An implicit sphere.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Tuple4D,
    pub radius: f64,
}

impl Sphere {
    pub fn new(mut center: Tuple4D, radius: f64) -> Sphere {
        if !center.is_point() {
            center.w = 1.0;
        }

        Sphere { center, radius }
    }

    /// Radius `1.0`, centered at the world origin.
    pub fn unit() -> Sphere {
        Sphere {
            center: Tuple4D::point(0.0, 0.0, 0.0),
            radius: 1.0,
        }
    }
}

impl Default for Sphere {
    fn default() -> Sphere {
        Sphere::unit()
    }
}

/// An infinite plane through `point` with normal `normal`.
///
/// The normal does not need to be unit length.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: Tuple4D,
    pub normal: Tuple4D,
}

impl Plane {
    pub fn new(point: Tuple4D, mut normal: Tuple4D) -> Plane {
        normal.w = 0.0;
        Plane { point, normal }
    }

    /// The `z == 0` plane, facing `+z`.
    ///
    /// The stored point keeps `w == 0`; it only ever feeds a dot product with
    /// the normal, whose `w` is zero as well.
    pub fn xy() -> Plane {
        Plane {
            point: Tuple4D::tuple(0.0, 0.0, 0.0, 0.0),
            normal: Tuple4D::vector(0.0, 0.0, 1.0),
        }
    }
}

impl Default for Plane {
    fn default() -> Plane {
        Plane::xy()
    }
}

#[test]
fn unit_sphere_defaults() {
    let s = Sphere::default();

    assert_eq!(s.center, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(s.radius, 1.0);
}

#[test]
fn sphere_center_is_a_point() {
    let s = Sphere::new(Tuple4D::vector(1.0, 2.0, 3.0), 2.0);

    assert!(s.center.is_point());
}

#[test]
fn plane_normal_is_a_vector() {
    let p = Plane::new(Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::tuple(0.0, 2.0, 0.0, 1.0));

    assert!(p.normal.is_vector());
}
