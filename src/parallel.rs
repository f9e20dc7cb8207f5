//! Parallel dispatch of per-pixel work into a shared framebuffer.
//!
//! Every pixel maps to exactly one ray, one color and one 4-byte slot of the
//! framebuffer. Tasks are handed disjoint `&mut` slices of the buffer, so the
//! workers never need a lock or an atomic to write their results, and the
//! output does not depend on scheduling or on the number of workers.

use std::path::{ Path, PathBuf };
use std::time::Instant;

use log::{ debug, info };
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::consts::CHANNELS;
use crate::error::{ Error, RenderError };
use crate::view::ViewState;
use crate::world::World;

/// Everything one render reads.
///
/// The view is held by value, so the camera it was taken from can keep
/// moving while a render is in flight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderContext {
    pub width: usize,
    pub height: usize,
    pub view: ViewState,
    pub world: World,
}

impl RenderContext {
    pub fn new(width: usize, height: usize, view: ViewState, world: World)
        -> RenderContext {
        RenderContext { width, height, view, world }
    }
}

/// How the pixel grid is split into batches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Staging {
    /// One batch holding every pixel.
    #[default]
    Flat,

    /// One batch per column, run column after column. Each task owns a row
    /// and fills that row's slot for the current column.
    Columns,
}

/// Worker pool settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Number of worker threads; `0` lets rayon pick one per core.
    pub threads: usize,
    pub staging: Staging,
}

impl Dispatch {
    pub fn new(threads: usize, staging: Staging) -> Dispatch {
        Dispatch { threads, staging }
    }

    pub fn build_pool(&self) -> Result<ThreadPool, RenderError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("ray-caster-{}", i))
            .build()?;

        Ok(pool)
    }
}

/// Timing and shape of a finished render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderStats {
    pub width: usize,
    pub height: usize,
    pub threads: usize,
    pub staging: Staging,

    /// Time spent casting rays.
    pub render_ms: u64,

    /// Time spent casting rays and writing the image.
    pub elapsed_ms: u64,

    pub output: PathBuf,
}

/// Renders a full frame into a freshly allocated canvas.
///
/// The view is validated before any worker starts; a failing pixel aborts
/// the whole render and no canvas is returned.
pub fn parallel_render(ctx: &RenderContext, dispatch: &Dispatch)
    -> Result<Canvas, RenderError> {
    let pool = dispatch.build_pool()?;
    render_in_pool(ctx, dispatch.staging, &pool)
}

/// Renders `ctx` on an existing pool.
pub fn render_in_pool(ctx: &RenderContext, staging: Staging, pool: &ThreadPool)
    -> Result<Canvas, RenderError> {
    let camera = Camera::new(ctx.width, ctx.height, &ctx.view)?;
    let mut canvas = Canvas::try_new(ctx.width, ctx.height)?;

    debug!("dispatching {}x{} pixels ({:?}) on {} threads",
        ctx.width, ctx.height, staging, pool.current_num_threads());

    let world = &ctx.world;
    let pixels = canvas.as_bytes_mut();
    pool.install(|| match staging {
        Staging::Flat => render_flat(&camera, world, pixels),
        Staging::Columns => render_columns(&camera, world, pixels),
    })?;

    Ok(canvas)
}

/// Renders, then moves the canvas into the image encoder.
///
/// A failed write is reported as `Error::Write`; the render itself has
/// completed by then.
pub fn render_to_file(ctx: &RenderContext, dispatch: &Dispatch, path: &Path)
    -> crate::error::Result<RenderStats> {
    let pool = dispatch.build_pool()?;
    let threads = pool.current_num_threads();

    info!("rendering {}x{} on {} threads", ctx.width, ctx.height, threads);
    let start = Instant::now();

    let canvas = render_in_pool(ctx, dispatch.staging, &pool)?;
    let render_time = start.elapsed();
    debug!("cast {} rays in {:.2?}", ctx.width * ctx.height, render_time);

    canvas.save(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let elapsed = start.elapsed();

    info!("saved render to {}", path.display());

    Ok(RenderStats {
        width: ctx.width,
        height: ctx.height,
        threads,
        staging: dispatch.staging,
        render_ms: render_time.as_millis() as u64,
        elapsed_ms: elapsed.as_millis() as u64,
        output: path.to_path_buf(),
    })
}

fn shade_pixel(camera: &Camera, world: &World, x: usize, y: usize)
    -> Result<[u8; 4], RenderError> {
    let ray = camera.ray_for_pixel(x, y)?;
    Ok(world.color_at(&ray).to_rgba8())
}

fn render_flat(camera: &Camera, world: &World, pixels: &mut [u8])
    -> Result<(), RenderError> {
    let width = camera.hsize;

    pixels.par_chunks_mut(CHANNELS)
        .enumerate()
        .try_for_each(|(idx, slot)| {
            let rgba = shade_pixel(camera, world, idx % width, idx / width)?;
            slot.copy_from_slice(&rgba);
            Ok(())
        })
}

fn render_columns(camera: &Camera, world: &World, pixels: &mut [u8])
    -> Result<(), RenderError> {
    let row_len = camera.hsize * CHANNELS;

    for i in 0..camera.hsize {
        let column = i * CHANNELS..(i + 1) * CHANNELS;

        pixels.par_chunks_mut(row_len)
            .enumerate()
            .try_for_each(|(j, row)| -> Result<(), RenderError> {
                let rgba = shade_pixel(camera, world, i, j)?;
                row[column.clone()].copy_from_slice(&rgba);
                Ok(())
            })?;
    }

    Ok(())
}

#[cfg(test)]
use crate::view::CameraRig;

#[cfg(test)]
fn default_context(width: usize, height: usize) -> RenderContext {
    let view = CameraRig::default().view_state(width, height);
    RenderContext::new(width, height, view, World::default())
}

#[test]
fn output_independent_of_threads_and_staging() {
    let view = CameraRig { yaw: 25.0, pitch: 10.0, pan_x: 0.2, ..Default::default() }
        .view_state(37, 23);
    let ctx = RenderContext::new(37, 23, view, World::default());

    let reference = parallel_render(&ctx, &Dispatch::new(1, Staging::Flat))
        .unwrap();

    for threads in [1, 2, 4, 7] {
        for staging in [Staging::Flat, Staging::Columns] {
            let canvas = parallel_render(&ctx, &Dispatch::new(threads, staging))
                .unwrap();
            assert_eq!(canvas.as_bytes(), reference.as_bytes(),
                "{} threads, {:?}", threads, staging);
        }
    }
}

#[test]
fn flat_staging_is_the_default() {
    assert_eq!(Staging::default(), Staging::Flat);
    assert_eq!(Dispatch::default(), Dispatch::new(0, Staging::Flat));
}

#[test]
fn column_staging_covers_every_column() {
    let ctx = default_context(9, 5);
    let flat = parallel_render(&ctx, &Dispatch::new(2, Staging::Flat)).unwrap();
    let columns = parallel_render(&ctx, &Dispatch::new(2, Staging::Columns))
        .unwrap();

    assert_eq!(columns, flat);
}

#[test]
fn every_slot_is_written() {
    let ctx = default_context(19, 11);

    for staging in [Staging::Flat, Staging::Columns] {
        let canvas = parallel_render(&ctx, &Dispatch::new(3, staging)).unwrap();

        assert_eq!(canvas.as_bytes().len(), 19 * 11 * 4);
        // Alpha is opaque for both hits and misses, so any untouched slot
        // would still read zero
        assert!(canvas.as_bytes().chunks(4).all(|px| px[3] == 255));
    }
}

#[test]
fn matches_sequential_cast() {
    let ctx = default_context(16, 12);
    let canvas = parallel_render(&ctx, &Dispatch::default()).unwrap();
    let camera = Camera::new(16, 12, &ctx.view).unwrap();

    for y in 0..12 {
        for x in 0..16 {
            let ray = camera.ray_for_pixel(x, y).unwrap();
            let expected = ctx.world.color_at(&ray).to_rgba8();
            assert_eq!(canvas.read_pixel(x, y), Some(expected));
        }
    }
}

#[test]
fn disc_radius_matches_projection() {
    let canvas = parallel_render(&default_context(64, 64), &Dispatch::default())
        .unwrap();

    // Eye 3 units from a unit sphere with a 45 degree field of view
    let angular = (1.0f64 / 3.0).asin().tan();
    let expected = 32.0 * angular / (22.5f64).to_radians().tan();

    let lit = |x: usize, y: usize| canvas.read_pixel(x, y).unwrap()[0] > 0;

    let row: Vec<usize> = (0..64).filter(|&x| lit(x, 32)).collect();
    let col: Vec<usize> = (0..64).filter(|&y| lit(32, y)).collect();

    for span in [&row, &col] {
        let first = *span.first().unwrap();
        let last = *span.last().unwrap();

        // Contiguous and centered on pixel 32
        assert_eq!(last - first + 1, span.len());
        assert_eq!(first + last, 64);

        let radius = (last - first) as f64 / 2.0;
        assert!((radius - expected).abs() <= 1.0,
            "radius {} vs {}", radius, expected);
    }

    // Red-tinted disc on black: only the red channel varies
    let center = canvas.read_pixel(32, 32).unwrap();
    assert!(center[0] >= 250, "center {:?}", center);
    assert_eq!(canvas.read_pixel(0, 0), Some([0, 0, 0, 255]));
    assert!(canvas.as_bytes().chunks(4).all(|px| px[1] == 0 && px[2] == 0));
}

#[test]
fn singular_view_aborts_render() {
    let mut ctx = default_context(8, 8);
    ctx.view.projection = crate::matrix::Matrix4D::new();

    assert!(matches!(parallel_render(&ctx, &Dispatch::default()),
        Err(RenderError::InvalidTransform)));
}

#[test]
fn zero_width_aborts_render() {
    let ctx = default_context(0, 8);

    assert!(matches!(parallel_render(&ctx, &Dispatch::default()),
        Err(RenderError::InvalidDimensions { width: 0, height: 8 })));
}

#[test]
fn render_to_file_reports_stats() {
    let path = std::env::temp_dir().join("ray-caster-render-to-file.png");
    let ctx = default_context(24, 16);

    let stats = render_to_file(&ctx, &Dispatch::new(2, Staging::Columns), &path)
        .unwrap();
    let decoded = image::open(&path).unwrap().to_rgba8();
    std::fs::remove_file(&path).ok();

    assert_eq!(decoded.dimensions(), (24, 16));
    assert_eq!(stats.threads, 2);
    assert_eq!(stats.staging, Staging::Columns);
    assert!(stats.render_ms <= stats.elapsed_ms);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["staging"], "columns");
    assert_eq!(json["width"], 24);
}

#[test]
fn write_failure_is_distinct_from_render_failure() {
    let path = std::env::temp_dir()
        .join("ray-caster-no-such-dir")
        .join("out.png");

    let err = render_to_file(&default_context(4, 4), &Dispatch::default(), &path)
        .unwrap_err();
    assert!(matches!(err, Error::Write { .. }));
}
