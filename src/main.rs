use std::process;

use clap::Parser;
use log::{ debug, error, info, warn };

use ray_caster::camera::Camera;
use ray_caster::error::Error;
use ray_caster::parallel::{ RenderContext, render_to_file };
use ray_caster::world::World;

mod cli;
mod logger;

use cli::{ Args, Pixel };
use logger::{ init_logger, level_for };

fn main() {
    let args = Args::parse();
    init_logger(level_for(args.verbose));

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let view = args.rig().view_state(args.width, args.height);
    debug!("model-view:\n{}", view.model_view);
    debug!("projection:\n{}", view.projection);

    let ctx = RenderContext::new(args.width, args.height, view, World::default());

    if let Some(pixel) = args.probe {
        probe(&ctx, pixel)?;
    }

    info!("raytracing");
    let stats = render_to_file(&ctx, &args.dispatch(), &args.output)?;

    if args.json {
        match serde_json::to_string(&stats) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("could not serialize render stats: {}", e),
        }
    } else {
        println!("performed in {}ms", stats.elapsed_ms);
    }

    Ok(())
}

/// Logs where the ray through `pixel` lands on the sphere.
fn probe(ctx: &RenderContext, pixel: Pixel) -> Result<(), Error> {
    if pixel.x >= ctx.width || pixel.y >= ctx.height {
        warn!("probe ({}, {}) is outside the {}x{} image",
            pixel.x, pixel.y, ctx.width, ctx.height);
        return Ok(());
    }

    let camera = Camera::new(ctx.width, ctx.height, &ctx.view)?;
    let ray = camera.ray_for_pixel(pixel.x, pixel.y)?;

    match ctx.world.probe(&ray) {
        Some(hit) => info!("probe ({}, {}): hit ({:.4}, {:.4}, {:.4}) at t = {:.4}, \
            {:.6} from center", pixel.x, pixel.y, hit.point.x, hit.point.y,
            hit.point.z, hit.t, hit.distance),
        None => info!("probe ({}, {}): miss", pixel.x, pixel.y),
    }

    Ok(())
}
