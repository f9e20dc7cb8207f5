//! View state: the camera transforms and viewport a render reads from.

use serde::{ Serialize, Deserialize };

use crate::consts::{ FIELD_OF_VIEW, NEAR_PLANE, FAR_PLANE, EYE_DISTANCE };
use crate::matrix::Matrix4D;

/// A window-space rectangle, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    /// A viewport covering a whole `width` by `height` window.
    ///
    /// Sizes past `i32::MAX` saturate; `Camera::new` rejects them before any
    /// ray is cast.
    pub fn window(width: usize, height: usize) -> Viewport {
        let clamp = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        Viewport { x: 0, y: 0, width: clamp(width), height: clamp(height) }
    }
}

/// A snapshot of the camera used for one render.
///
/// `viewport` must match the dimensions `projection` was built for.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub model_view: Matrix4D,
    pub projection: Matrix4D,
    pub viewport: Viewport,
}

impl ViewState {
    /// Combined world-to-clip transform.
    pub fn model_view_projection(&self) -> Matrix4D {
        self.projection * self.model_view
    }
}

/// Camera parameters for building a `ViewState` without an interactive
/// viewer.
///
/// The model-view is composed the way the viewer composes it:
/// pull the eye back along `+z`, pan, rotate, then scale the scene.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    /// Vertical field of view, in degrees.
    pub field_of_view: f64,
    pub near: f64,
    pub far: f64,

    /// Distance from the eye to the origin along `+z`.
    pub distance: f64,
    pub pan_x: f64,
    pub pan_y: f64,

    /// Rotation about the Y axis, in degrees.
    pub yaw: f64,
    /// Rotation about the X axis, in degrees.
    pub pitch: f64,
    pub scale: f64,
}

impl Default for CameraRig {
    fn default() -> CameraRig {
        CameraRig {
            field_of_view: FIELD_OF_VIEW,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            distance: EYE_DISTANCE,
            pan_x: 0.0,
            pan_y: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            scale: 1.0,
        }
    }
}

impl CameraRig {
    pub fn model_view(&self) -> Matrix4D {
        let rotation = Matrix4D::rotation_y(self.yaw.to_radians())
            * Matrix4D::rotation_x(self.pitch.to_radians());

        Matrix4D::translation(0.0, 0.0, -self.distance)
            * Matrix4D::translation(self.pan_x, self.pan_y, 0.0)
            * rotation
            * Matrix4D::scaling(self.scale, self.scale, self.scale)
    }

    pub fn projection(&self, width: usize, height: usize) -> Matrix4D {
        let aspect = width as f64 / height as f64;
        Matrix4D::perspective(self.field_of_view, aspect, self.near, self.far)
    }

    /// Snapshots the rig for a `width` by `height` window.
    pub fn view_state(&self, width: usize, height: usize) -> ViewState {
        ViewState {
            model_view: self.model_view(),
            projection: self.projection(width, height),
            viewport: Viewport::window(width, height),
        }
    }
}

#[cfg(test)]
use crate::tuple::Tuple4D;

#[test]
fn default_rig_pulls_eye_back() {
    let mv = CameraRig::default().model_view();

    assert_eq!(mv, Matrix4D::translation(0.0, 0.0, -3.0));
    assert_eq!(mv * Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::point(0.0, 0.0, -3.0));
}

#[test]
fn rig_scales_before_translating() {
    let rig = CameraRig { scale: 2.0, pan_x: 0.5, ..Default::default() };
    let p = rig.model_view() * Tuple4D::point(1.0, 0.0, 0.0);

    assert_eq!(p, Tuple4D::point(2.5, 0.0, -3.0));
}

#[test]
fn rig_yaw_rotates_scene() {
    let rig = CameraRig { yaw: 90.0, ..Default::default() };
    let p = rig.model_view() * Tuple4D::point(0.0, 0.0, 1.0);

    assert_eq!(p, Tuple4D::point(1.0, 0.0, -3.0));
}

#[test]
fn view_state_viewport_matches_window() {
    let view = CameraRig::default().view_state(640, 480);

    assert_eq!(view.viewport, Viewport { x: 0, y: 0, width: 640, height: 480 });
    assert!(view.model_view_projection().inverse().is_some());
}

#[test]
fn oversized_window_saturates() {
    let huge = i32::MAX as usize + 1;

    assert_eq!(Viewport::window(huge, 4).width, i32::MAX);
    assert_eq!(Viewport::window(huge, 4).height, 4);
}

#[test]
fn rig_from_json() {
    let rig: CameraRig = serde_json::from_str(r#"{
        "field_of_view": 60.0, "near": 0.5, "far": 10.0, "distance": 4.0,
        "pan_x": 0.0, "pan_y": 0.0, "yaw": 0.0, "pitch": 0.0, "scale": 1.0
    }"#).unwrap();

    assert_eq!(rig.distance, 4.0);
    assert_eq!(rig.model_view(), Matrix4D::translation(0.0, 0.0, -4.0));
}
