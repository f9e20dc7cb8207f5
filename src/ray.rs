use crate::tuple::Tuple4D;

/// A world-space ray.
///
/// `origin` is a point and `direction` a vector; `new` forces the `w`
/// components so a caller can pass raw unprojected tuples.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray4D {
    pub origin: Tuple4D,
    pub direction: Tuple4D,
}

impl Ray4D {
    pub fn new(mut origin: Tuple4D, mut direction: Tuple4D) -> Ray4D {
        if !origin.is_point() {
            origin.w = 1.0;
        }

        if !direction.is_vector() {
            direction.w = 0.0;
        }

        Ray4D { origin, direction }
    }

    /// The point `t` units along the ray.
    pub fn position(&self, t: f64) -> Tuple4D {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray4D::new(
                Tuple4D::point(2.0, 3.0, 4.0),
                Tuple4D::vector(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Tuple4D::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple4D::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple4D::point(4.5, 3.0, 4.0));
}

#[test]
fn ray_fixes_homogeneous_components() {
    let r = Ray4D::new(
                Tuple4D::tuple(0.0, 0.0, 5.0, 0.0),
                Tuple4D::tuple(0.0, 0.0, -1.0, 1.0)
            );

    assert!(r.origin.is_point());
    assert!(r.direction.is_vector());
}
