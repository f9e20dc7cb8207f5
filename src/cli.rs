use std::path::PathBuf;
use std::str::FromStr;

use clap::{ ArgEnum, Parser };

use ray_caster::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, OUT_FILE,
    FIELD_OF_VIEW, NEAR_PLANE, FAR_PLANE, EYE_DISTANCE };
use ray_caster::parallel::{ Dispatch, Staging };
use ray_caster::view::CameraRig;

/// Batching strategy, as accepted on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ArgEnum)]
pub enum StagingArg {
    Flat,
    Columns,
}

impl From<StagingArg> for Staging {
    fn from(arg: StagingArg) -> Staging {
        match arg {
            StagingArg::Flat => Staging::Flat,
            StagingArg::Columns => Staging::Columns,
        }
    }
}

/// A pixel coordinate written as `X,Y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
}

impl FromStr for Pixel {
    type Err = String;

    fn from_str(s: &str) -> Result<Pixel, String> {
        let (x, y) = s.split_once(',')
            .ok_or_else(|| format!("expected X,Y but got `{}`", s))?;

        let x = x.trim().parse().map_err(|e| format!("bad x `{}`: {}", x, e))?;
        let y = y.trim().parse().map_err(|e| format!("bad y `{}`: {}", y, e))?;

        Ok(Pixel { x, y })
    }
}

/// Renders a unit sphere by casting one ray per pixel.
#[derive(Parser, Debug)]
#[clap(name = "ray-caster", version, about)]
pub struct Args {
    /// Output image path
    #[clap(parse(from_os_str), default_value = OUT_FILE)]
    pub output: PathBuf,

    /// Image width in pixels
    #[clap(long, default_value_t = CANVAS_WIDTH)]
    pub width: usize,

    /// Image height in pixels
    #[clap(long, default_value_t = CANVAS_HEIGHT)]
    pub height: usize,

    /// Vertical field of view in degrees
    #[clap(long, default_value_t = FIELD_OF_VIEW)]
    pub fov: f64,

    /// Near clipping plane distance
    #[clap(long, default_value_t = NEAR_PLANE)]
    pub near: f64,

    /// Far clipping plane distance
    #[clap(long, default_value_t = FAR_PLANE)]
    pub far: f64,

    /// Distance from the eye to the origin
    #[clap(long, default_value_t = EYE_DISTANCE)]
    pub distance: f64,

    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub pan_x: f64,

    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub pan_y: f64,

    /// Rotation about the Y axis in degrees
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub yaw: f64,

    /// Rotation about the X axis in degrees
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub pitch: f64,

    /// Uniform scene scale
    #[clap(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Worker threads (0 uses every core)
    #[clap(short, long, default_value_t = 0)]
    pub threads: usize,

    /// How pixels are batched across the workers
    #[clap(long, arg_enum, default_value = "flat")]
    pub staging: StagingArg,

    /// Log where the ray through pixel X,Y hits the sphere
    #[clap(long)]
    pub probe: Option<Pixel>,

    /// Print render statistics as JSON
    #[clap(long)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u64,
}

impl Args {
    pub fn rig(&self) -> CameraRig {
        CameraRig {
            field_of_view: self.fov,
            near: self.near,
            far: self.far,
            distance: self.distance,
            pan_x: self.pan_x,
            pan_y: self.pan_y,
            yaw: self.yaw,
            pitch: self.pitch,
            scale: self.scale,
        }
    }

    pub fn dispatch(&self) -> Dispatch {
        Dispatch::new(self.threads, self.staging.into())
    }
}

#[test]
fn defaults_match_viewer() {
    let args = Args::try_parse_from(["ray-caster"]).unwrap();

    assert_eq!(args.output, PathBuf::from("output.png"));
    assert_eq!((args.width, args.height), (512, 512));
    assert_eq!(args.rig(), CameraRig::default());
    assert_eq!(args.dispatch(), Dispatch::default());
    assert_eq!(args.probe, None);
}

#[test]
fn parses_overrides() {
    let args = Args::try_parse_from([
        "ray-caster", "frame.png",
        "--width", "64", "--height", "48",
        "--pan-x", "-0.5", "--yaw", "30",
        "--threads", "4", "--staging", "columns",
        "--probe", "10,20", "--json", "-vv",
    ]).unwrap();

    assert_eq!(args.output, PathBuf::from("frame.png"));
    assert_eq!((args.width, args.height), (64, 48));
    assert_eq!(args.rig().pan_x, -0.5);
    assert_eq!(args.rig().yaw, 30.0);
    assert_eq!(args.dispatch(), Dispatch::new(4, Staging::Columns));
    assert_eq!(args.probe, Some(Pixel { x: 10, y: 20 }));
    assert!(args.json);
    assert_eq!(args.verbose, 2);
}

#[test]
fn rejects_malformed_probe() {
    assert!("10".parse::<Pixel>().is_err());
    assert!("a,2".parse::<Pixel>().is_err());
    assert_eq!(" 3, 4".parse::<Pixel>(), Ok(Pixel { x: 3, y: 4 }));
    assert!(Args::try_parse_from(["ray-caster", "--probe", "3"]).is_err());
}
