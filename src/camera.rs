use crate::error::RenderError;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::view::{ ViewState, Viewport };

/// Generates world-space rays for the pixels of a `hsize` by `vsize` image.
///
/// The inverse of `projection * model_view` is computed once, when the camera
/// is built; a singular view is rejected there instead of producing NaN rays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the image, in pixels.
    pub hsize: usize,

    /// The vertical size of the image, in pixels.
    pub vsize: usize,

    viewport: Viewport,
    inverse: Matrix4D,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, view: &ViewState)
        -> Result<Camera, RenderError> {
        let fits = |n: usize| n > 0 && i32::try_from(n).is_ok();
        if !fits(hsize) || !fits(vsize) {
            return Err(RenderError::InvalidDimensions {
                width: hsize,
                height: vsize,
            });
        }

        let inverse = view.model_view_projection().inverse()
            .ok_or(RenderError::InvalidTransform)?;

        Ok(Camera { hsize, vsize, viewport: view.viewport, inverse })
    }

    /// Builds the ray through pixel `(px, py)`.
    ///
    /// Pixel rows count down from the top of the window, so `py` is flipped
    /// before unprojecting into the bottom-left window convention. The ray
    /// starts on the near clipping plane and points at the matching far plane
    /// point.
    pub fn ray_for_pixel(&self, px: usize, py: usize)
        -> Result<Ray4D, RenderError> {
        let x = px as f64;
        let y = self.vsize as f64 - py as f64;

        let near = unproject(Tuple4D::point(x, y, 0.0), &self.inverse,
            &self.viewport).ok_or(RenderError::InvalidTransform)?;
        let far = unproject(Tuple4D::point(x, y, 1.0), &self.inverse,
            &self.viewport).ok_or(RenderError::InvalidTransform)?;

        let direction = (far - near).normalize();
        if !direction.is_finite() {
            return Err(RenderError::InvalidTransform);
        }

        Ok(Ray4D::new(near, direction))
    }
}

/// Maps a window coordinate `(x, y, depth)` back into world space.
///
/// `inverse` is the inverse of `projection * model_view`. The window
/// coordinate is taken to normalized device coordinates through `viewport`,
/// multiplied by `inverse` and divided by its `w`. Returns `None` when the
/// result is a point at infinity.
pub fn unproject(window: Tuple4D, inverse: &Matrix4D, viewport: &Viewport)
    -> Option<Tuple4D> {
    let ndc = Tuple4D::point(
        (window.x - viewport.x as f64) / viewport.width as f64 * 2.0 - 1.0,
        (window.y - viewport.y as f64) / viewport.height as f64 * 2.0 - 1.0,
        window.z * 2.0 - 1.0,
    );

    let world = *inverse * ndc;
    if world.w == 0.0 {
        return None;
    }

    let world = world / world.w;
    if world.is_finite() { Some(world) } else { None }
}

#[cfg(test)]
use crate::view::CameraRig;

#[test]
fn ray_through_center() {
    let view = CameraRig::default().view_state(64, 64);
    let c = Camera::new(64, 64, &view).unwrap();
    let r = c.ray_for_pixel(32, 32).unwrap();

    // Near plane sits one unit in front of an eye at z == 3
    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 2.0));
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_top_left_corner() {
    let view = CameraRig::default().view_state(64, 64);
    let c = Camera::new(64, 64, &view).unwrap();
    let r = c.ray_for_pixel(0, 0).unwrap();

    let half = (22.5f64).to_radians().tan();
    let expected = Tuple4D::vector(-half, half, -1.0).normalize();

    assert_eq!(r.origin, Tuple4D::point(-half, half, 2.0));
    assert_eq!(r.direction, expected);
}

#[test]
fn rays_are_unit_length() {
    let view = CameraRig { yaw: 30.0, pitch: -15.0, ..Default::default() }
        .view_state(40, 30);
    let c = Camera::new(40, 30, &view).unwrap();

    for (x, y) in [(0, 0), (39, 29), (7, 22), (20, 15)] {
        let r = c.ray_for_pixel(x, y).unwrap();
        assert!((r.direction.magnitude() - 1.0).abs() < 1e-12);
        assert!(r.origin.is_point());
        assert!(r.direction.is_vector());
    }
}

#[test]
fn unproject_inverts_projection() {
    let view = CameraRig { pan_x: 0.25, yaw: 20.0, ..Default::default() }
        .view_state(100, 50);
    let mvp = view.model_view_projection();
    let world = Tuple4D::point(0.3, -0.2, 0.5);

    let clip = mvp * world;
    let ndc = clip / clip.w;
    let window = Tuple4D::point(
        (ndc.x + 1.0) / 2.0 * 100.0,
        (ndc.y + 1.0) / 2.0 * 50.0,
        (ndc.z + 1.0) / 2.0,
    );

    let back = unproject(window, &mvp.inverse().unwrap(), &view.viewport);
    assert_eq!(back, Some(world));
}

#[test]
fn singular_view_is_rejected() {
    let mut view = CameraRig::default().view_state(64, 64);
    view.model_view = Matrix4D::scaling(0.0, 0.0, 0.0);

    assert!(matches!(Camera::new(64, 64, &view),
        Err(RenderError::InvalidTransform)));
}

#[test]
fn zero_dimensions_are_rejected() {
    let view = CameraRig::default().view_state(64, 64);

    assert!(matches!(Camera::new(0, 64, &view),
        Err(RenderError::InvalidDimensions { width: 0, height: 64 })));
}

#[test]
fn oversized_dimensions_are_rejected() {
    let huge = i32::MAX as usize + 1;
    let view = CameraRig::default().view_state(huge, 64);

    assert!(matches!(Camera::new(huge, 64, &view),
        Err(RenderError::InvalidDimensions { height: 64, .. })));
}

#[test]
fn empty_viewport_yields_invalid_ray() {
    let mut view = CameraRig::default().view_state(8, 8);
    view.viewport = Viewport::default();
    let c = Camera::new(8, 8, &view).unwrap();

    assert!(matches!(c.ray_for_pixel(4, 4),
        Err(RenderError::InvalidTransform)));
}
