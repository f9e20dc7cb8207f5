use std::path::Path;

use image::ImageError;
use image::error::{ ParameterError, ParameterErrorKind };

use crate::color::Color;
use crate::consts::CHANNELS;
use crate::error::RenderError;

/// An RGBA8 framebuffer.
///
/// Pixels are stored row-major as a flat byte vector, four bytes per pixel.
/// Row `0` is the top row of the image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    pixels: Vec<u8>,
}

impl Canvas {
    /// Creates a zeroed canvas, aborting on allocation failure.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![0; width * height * CHANNELS],
        }
    }

    /// Creates a zeroed canvas, reporting allocation failure as an error.
    ///
    /// Renders allocate through this so that an oversized request fails the
    /// render instead of the process.
    pub fn try_new(width: usize, height: usize) -> Result<Canvas, RenderError> {
        let len = width.checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(RenderError::InvalidDimensions { width, height })?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        pixels.resize(len, 0);

        Ok(Canvas { width, height, pixels })
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: usize, y: usize) -> usize {
        CHANNELS * (y * self.width + x)
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored.
    ///
    /// ```
    /// # use ray_caster::color::Color;
    /// # use ray_caster::canvas::Canvas;
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &Color::rgb(1.0, 0.0, 1.0));
    /// assert_eq!(canvas.read_pixel(4, 2), Some([255, 0, 255, 255]));
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        let offset = self.offset(x, y);
        self.pixels[offset..offset + CHANNELS].copy_from_slice(&pixel.to_rgba8());
    }

    /// Reads the bytes of a pixel, or `None` if it is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let offset = self.offset(x, y);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + CHANNELS]);

        Some(rgba)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Encodes the canvas to `path`, consuming it.
    ///
    /// The format follows the file extension; `.png` is the one this crate
    /// enables. Sizes that do not fit the encoder's `u32` dimensions are
    /// rejected without touching `path`.
    pub fn save(self, path: &Path) -> image::ImageResult<()> {
        let (width, height) = match (u32::try_from(self.width),
            u32::try_from(self.height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(ImageError::Parameter(
                ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))),
        };

        image::save_buffer(path, &self.pixels, width, height,
            image::ColorType::Rgba8)
    }
}

#[test]
fn new_canvas_is_zeroed() {
    let canvas = Canvas::new(3, 2);

    assert_eq!(canvas.as_bytes().len(), 3 * 2 * 4);
    assert!(canvas.as_bytes().iter().all(|b| *b == 0));
}

#[test]
fn try_new_matches_new() {
    assert_eq!(Canvas::try_new(5, 7).unwrap(), Canvas::new(5, 7));
}

#[test]
fn try_new_rejects_overflow() {
    assert!(matches!(Canvas::try_new(usize::MAX, 2),
        Err(RenderError::InvalidDimensions { .. })));
}

#[test]
fn try_new_reports_allocation_failure() {
    // Fits in usize, but no allocator will hand this out
    assert!(matches!(Canvas::try_new(usize::MAX / 16, 1),
        Err(RenderError::Allocation(_))));
}

#[test]
fn offsets_are_row_major() {
    let canvas = Canvas::new(10, 4);

    assert_eq!(canvas.offset(0, 0), 0);
    assert_eq!(canvas.offset(3, 0), 12);
    assert_eq!(canvas.offset(3, 2), 4 * (2 * 10 + 3));
}

#[test]
fn out_of_bounds_is_ignored() {
    let mut canvas = Canvas::new(2, 2);
    canvas.write_pixel(2, 0, &Color::rgb(1.0, 1.0, 1.0));

    assert_eq!(canvas, Canvas::new(2, 2));
    assert_eq!(canvas.read_pixel(0, 2), None);
}

#[test]
fn save_png_round_trip() {
    let path = std::env::temp_dir().join("ray-caster-canvas-save.png");

    let mut canvas = Canvas::new(3, 2);
    canvas.write_pixel(1, 0, &Color::rgb(1.0, 0.0, 0.0));
    canvas.write_pixel(2, 1, &Color::rgba(0.0, 0.0, 1.0, 0.5));
    let expected = canvas.clone();

    canvas.save(&path).unwrap();
    let decoded = image::open(&path).unwrap().to_rgba8();
    std::fs::remove_file(&path).ok();

    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.as_raw().as_slice(), expected.as_bytes());
}

#[cfg(target_pointer_width = "64")]
#[test]
fn save_rejects_oversized_width() {
    let path = std::env::temp_dir().join("ray-caster-oversized.png");
    let canvas = Canvas::new(u32::MAX as usize + 1, 0);

    assert!(matches!(canvas.save(&path), Err(ImageError::Parameter(_))));
    assert!(!path.exists());
}

#[test]
fn save_to_missing_directory_fails() {
    let path = std::env::temp_dir()
        .join("ray-caster-no-such-dir")
        .join("out.png");

    assert!(Canvas::new(1, 1).save(&path).is_err());
}
