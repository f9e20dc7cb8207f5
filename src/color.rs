use crate::feq;

/// An RGBA color.
///
/// Each channel nominally ranges from 0.0 to 1.0 inclusive; values outside
/// that range are clamped when the color is quantized to bytes.
///
/// # Examples
///
/// ```
/// # use ray_caster::color::Color;
/// let red = Color::rgba(1.0, 0.0, 0.0, 1.0);
/// assert_eq!(red.to_rgba8(), [255, 0, 0, 255]);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Channel-wise equality, allowing for floating point error.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b) &&
            feq(self.a, other.a)
    }
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// An opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    /// Opaque black, the background of every render.
    pub fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    /// Quantizes the color to four bytes.
    ///
    /// Channels are clamped to `[0, 1]`, scaled by 255 and truncated.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;

        [quantize(self.r), quantize(self.g), quantize(self.b), quantize(self.a)]
    }
}

#[test]
fn black_is_opaque() {
    assert_eq!(Color::black().to_rgba8(), [0, 0, 0, 255]);
}

#[test]
fn quantize_truncates() {
    let c = Color::rgba(0.5, 0.999, 0.0, 1.0);

    assert_eq!(c.to_rgba8(), [127, 254, 0, 255]);
}

#[test]
fn quantize_clamps() {
    let c = Color::rgba(1.7, -0.3, f64::NAN, 1.0);

    // NaN clamps to NaN, which saturates to zero on the cast
    assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);
}
