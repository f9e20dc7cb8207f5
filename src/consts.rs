// Runtime parameters
pub const CANVAS_WIDTH: usize = 512;
pub const CANVAS_HEIGHT: usize = 512;
pub const OUT_FILE: &str = "output.png";

// Camera defaults, matching the interactive viewer
pub const FIELD_OF_VIEW: f64 = 45.0;
pub const NEAR_PLANE: f64 = 1.0;
pub const FAR_PLANE: f64 = 5.0;
pub const EYE_DISTANCE: f64 = 3.0;

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;
pub const TANGENT_EPSILON: f64 = 1e-7;
pub const PLANE_EPSILON: f64 = 1e-7;

/// Returned by intersection tests when nothing lies in front of the ray.
pub const MISS: f64 = -1.0;

/// Bytes per framebuffer pixel (RGBA8).
pub const CHANNELS: usize = 4;
