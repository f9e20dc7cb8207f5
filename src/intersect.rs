//! Analytic ray-primitive intersection.
//!
//! Every test returns the ray parameter `t` of the hit, or `MISS` (`-1.0`)
//! when there is nothing to report. Callers still check `t > 0.0` for the
//! sphere, whose nearest root may lie behind the ray origin.

use crate::near;
use crate::consts::{ MISS, TANGENT_EPSILON, PLANE_EPSILON };
use crate::ray::Ray4D;
use crate::geometry::{ Sphere, Plane };

/// How a ray crosses a sphere, classified by the quadratic discriminant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Crossing {
    /// Negative discriminant.
    Miss,

    /// Discriminant within tolerance of zero; the single root `-b / 2a`.
    Tangent(f64),

    /// Two distinct roots, smaller first.
    Secant(f64, f64),
}

/// Solves `|p0 + tV - C|^2 = r^2` for `t`.
pub fn sphere_crossing(ray: &Ray4D, sphere: &Sphere) -> Crossing {
    let sphere_to_ray = ray.origin - sphere.center;

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * ray.direction.dot(&sphere_to_ray);
    let c = sphere_to_ray.dot(&sphere_to_ray) - sphere.radius * sphere.radius;

    let discriminant = b * b - (4.0 * a * c);
    if discriminant < 0.0 {
        return Crossing::Miss;
    }

    if near(discriminant, 0.0, TANGENT_EPSILON) {
        return Crossing::Tangent(-b / (2.0 * a));
    }

    let t1 = (-b + discriminant.sqrt()) / (2.0 * a);
    let t2 = (-b - discriminant.sqrt()) / (2.0 * a);

    Crossing::Secant(t1.min(t2), t1.max(t2))
}

/// Intersects a ray with a sphere, returning the nearest root.
///
/// The nearest root is returned whatever its sign, so a ray starting inside
/// the sphere gets a negative `t`.
///
/// ```
/// # use ray_caster::tuple::Tuple4D;
/// # use ray_caster::ray::Ray4D;
/// # use ray_caster::geometry::Sphere;
/// # use ray_caster::intersect::ray_sphere_intersection;
/// let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, -1.0));
/// assert_eq!(ray_sphere_intersection(&ray, &Sphere::unit()), 4.0);
/// ```
pub fn ray_sphere_intersection(ray: &Ray4D, sphere: &Sphere) -> f64 {
    match sphere_crossing(ray, sphere) {
        Crossing::Miss => MISS,
        Crossing::Tangent(t) => t,
        Crossing::Secant(nearest, _) => nearest,
    }
}

/// Intersects a ray with a plane.
///
/// Only rays travelling along the plane normal (positive denominator) are
/// reported; rays hitting the plane from the side the normal points to, or
/// running parallel to it, return `MISS`.
pub fn ray_plane_intersection(ray: &Ray4D, plane: &Plane) -> f64 {
    let n_normal = plane.normal.normalize();
    let n_dir = ray.direction.normalize();
    let denominator = n_normal.dot(&n_dir);

    if denominator > PLANE_EPSILON {
        let dist = plane.point - ray.origin;
        return dist.dot(&plane.normal) / denominator;
    }

    MISS
}

#[cfg(test)]
use crate::tuple::Tuple4D;

#[test]
fn sphere_head_on() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, -1.0));

    assert_eq!(ray_sphere_intersection(&ray, &Sphere::unit()), 4.0);
    assert_eq!(sphere_crossing(&ray, &Sphere::unit()),
        Crossing::Secant(4.0, 6.0));
}

#[test]
fn sphere_parallel_miss() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(1.0, 0.0, 0.0));

    assert_eq!(ray_sphere_intersection(&ray, &Sphere::unit()), -1.0);
    assert_eq!(sphere_crossing(&ray, &Sphere::unit()), Crossing::Miss);
}

#[test]
fn sphere_tangent_single_root() {
    let ray = Ray4D::new(Tuple4D::point(1.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, -1.0));

    // a = 1, b = 2 * V.(p0 - C) = -10
    let expected = 10.0 / 2.0;

    match sphere_crossing(&ray, &Sphere::unit()) {
        Crossing::Tangent(t) => assert!((t - expected).abs() < 1e-6),
        other => panic!("expected a tangent crossing, got {:?}", other),
    }

    assert!((ray_sphere_intersection(&ray, &Sphere::unit()) - expected).abs()
        < 1e-6);
}

#[test]
fn sphere_near_tangent_uses_single_root() {
    // Discriminant is 2^-49: positive, but under the 1e-14 absolute tolerance
    let grazing = 1.0 - f64::EPSILON;
    let ray = Ray4D::new(Tuple4D::point(grazing, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, -1.0));

    match sphere_crossing(&ray, &Sphere::unit()) {
        Crossing::Tangent(t) => assert!(t.abs() < 1e-6),
        other => panic!("expected a tangent crossing, got {:?}", other),
    }
}

#[test]
fn sphere_from_inside_is_negative() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(ray_sphere_intersection(&ray, &Sphere::unit()), -1.0);
}

#[test]
fn sphere_behind_origin() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(ray_sphere_intersection(&ray, &Sphere::unit()), -6.0);
}

#[test]
fn sphere_off_center() {
    let sphere = Sphere::new(Tuple4D::point(2.0, 0.0, 0.0), 0.5);
    let ray = Ray4D::new(Tuple4D::point(2.0, 0.0, 3.0),
        Tuple4D::vector(0.0, 0.0, -1.0));

    assert_eq!(ray_sphere_intersection(&ray, &sphere), 2.5);
}

#[test]
fn sphere_unnormalized_direction() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, -2.0));

    assert_eq!(ray_sphere_intersection(&ray, &Sphere::unit()), 2.0);
}

#[test]
fn plane_along_normal() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(ray_plane_intersection(&ray, &Plane::xy()), 5.0);
}

#[test]
fn plane_oblique() {
    let ray = Ray4D::new(Tuple4D::point(3.0, 4.0, -2.0),
        Tuple4D::vector(1.0, 0.0, 1.0).normalize());
    let t = ray_plane_intersection(&ray, &Plane::xy());

    assert!((t - 2.0 * 2.0f64.sqrt()).abs() < 1e-9);
    assert_eq!(ray.position(t), Tuple4D::point(5.0, 4.0, 0.0));
}

#[test]
fn plane_against_normal_is_culled() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, -1.0));

    assert_eq!(ray_plane_intersection(&ray, &Plane::xy()), -1.0);
}

#[test]
fn plane_parallel_misses() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, -1.0),
        Tuple4D::vector(1.0, 0.0, 0.0));

    assert_eq!(ray_plane_intersection(&ray, &Plane::xy()), -1.0);
}

#[test]
fn plane_offset() {
    let plane = Plane::new(Tuple4D::point(0.0, 2.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0));
    let ray = Ray4D::new(Tuple4D::point(1.0, -1.0, 1.0),
        Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(ray_plane_intersection(&ray, &plane), 3.0);
}
