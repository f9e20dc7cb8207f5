use serde::{ Serialize, Deserialize };

use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::geometry::Sphere;
use crate::intersect::ray_sphere_intersection;

/// The scene: a single implicit sphere.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub sphere: Sphere,
}

/// A forward hit found by `World::probe`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Probe {
    pub t: f64,
    pub point: Tuple4D,

    /// Distance from the hit point to the sphere center. Equal to the radius
    /// up to rounding.
    pub distance: f64,
}

impl World {
    pub fn new(sphere: Sphere) -> World {
        World { sphere }
    }

    /// Casts `ray` into the world and shades the nearest intersection.
    pub fn color_at(&self, ray: &Ray4D) -> Color {
        let t = ray_sphere_intersection(ray, &self.sphere);
        shade(ray, t)
    }

    /// Reports where `ray` hits the sphere, if it hits in front of its origin.
    pub fn probe(&self, ray: &Ray4D) -> Option<Probe> {
        let t = ray_sphere_intersection(ray, &self.sphere);
        if t <= 0.0 {
            return None;
        }

        let point = ray.position(t);
        let distance = (point - self.sphere.center).magnitude();

        Some(Probe { t, point, distance })
    }
}

/// Shades an intersection result.
///
/// A miss (`t < 0`) is opaque black. A hit is tinted red by the absolute `z`
/// of the hit point.
pub fn shade(ray: &Ray4D, t: f64) -> Color {
    if t < 0.0 {
        return Color::black();
    }

    let hit = ray.position(t);
    Color::rgb(hit.z.abs(), 0.0, 0.0)
}

#[test]
fn miss_is_black() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(1.0, 0.0, 0.0));

    assert_eq!(shade(&ray, -1.0), Color::rgba(0.0, 0.0, 0.0, 1.0));
    assert_eq!(World::default().color_at(&ray), Color::black());
}

#[test]
fn hit_is_tinted_by_depth() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, -1.0));

    // Hit at z == 1
    assert_eq!(World::default().color_at(&ray), Color::rgba(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn hit_uses_absolute_depth() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(shade(&ray, 4.5), Color::rgb(0.5, 0.0, 0.0));
}

#[test]
fn zero_t_counts_as_hit() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.25),
        Tuple4D::vector(0.0, 0.0, -1.0));

    assert_eq!(shade(&ray, 0.0), Color::rgb(0.25, 0.0, 0.0));
}

#[test]
fn probe_lands_on_surface() {
    let ray = Ray4D::new(Tuple4D::point(0.5, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, -1.0));
    let probe = World::default().probe(&ray).unwrap();

    assert!((probe.distance - 1.0).abs() < 1e-12);
    assert_eq!(probe.point, Tuple4D::point(0.5, 0.0, 0.75f64.sqrt()));
}

#[test]
fn probe_ignores_hits_behind() {
    let ray = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(World::default().probe(&ray).is_none());
}
