//! Error types for rendering and writing images.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a render. No image is produced when one of these occurs.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Width or height is zero.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// The view transform is singular, or unprojection produced a point at
    /// infinity.
    #[error("view transform is not invertible")]
    InvalidTransform,

    /// The framebuffer could not be allocated.
    #[error("failed to allocate framebuffer: {0}")]
    Allocation(#[from] TryReserveError),

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors surfaced by a full render-and-save invocation.
///
/// `Write` means the render itself completed; only encoding or writing the
/// image failed.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("render succeeded but writing {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn write_error_names_the_path() {
    let err = Error::Write {
        path: PathBuf::from("/tmp/out.png"),
        source: image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied, "denied")),
    };

    let msg = err.to_string();
    assert!(msg.contains("/tmp/out.png"));
    assert!(msg.starts_with("render succeeded"));
}

#[test]
fn render_error_is_transparent() {
    let err: Error = RenderError::InvalidTransform.into();

    assert_eq!(err.to_string(), "view transform is not invertible");
}
