use argh::FromArgs;
use std::{path::PathBuf, time::Instant};

use fastcorner::{
    image::Image,
    imgproc::{
        color::{gray_from_rgb_u8, rgb_from_gray},
        draw::draw_corners,
        features::{ExecutionMode, FastDetector, FastDetectorConfig, DEFAULT_THRESHOLD},
    },
    io::png::{read_image_png_rgb8, write_image_png_rgb8},
};

/// Detect FAST corners on an image and paint them on a grayscale copy.
#[derive(FromArgs)]
struct Args {
    /// path to the image to detect FAST corners on
    #[argh(option)]
    image_path: PathBuf,

    /// path of the PNG with the painted corners
    #[argh(option, default = "PathBuf::from(\"corners.png\")")]
    output_path: PathBuf,

    /// threshold for the FAST detector
    #[argh(option, default = "DEFAULT_THRESHOLD")]
    threshold: i32,

    /// half size of the corner markers, 0 paints a single pixel
    #[argh(option, default = "0")]
    marker_radius: usize,

    /// scan the image rows in parallel
    #[argh(switch)]
    parallel: bool,

    /// skip the compass pre-filter and run the full segment test on every pixel
    #[argh(switch)]
    no_fast_rejection: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    // read the image and convert it to grayscale
    let img_rgb8 = read_image_png_rgb8(&args.image_path)?;
    log::info!("loaded {} ({})", args.image_path.display(), img_rgb8.size());

    let mut img_gray8 = Image::<u8, 1>::from_size_val(img_rgb8.size(), 0)?;
    gray_from_rgb_u8(&img_rgb8, &mut img_gray8)?;

    // detect the corners
    let detector = FastDetector::new(FastDetectorConfig {
        threshold: args.threshold,
        fast_rejection: !args.no_fast_rejection,
        execution: if args.parallel {
            ExecutionMode::ParallelRows
        } else {
            ExecutionMode::Serial
        },
    })?;

    let start = Instant::now();
    let corners = detector.detect(&img_gray8);
    log::info!("found {} corners in {:?}", corners.len(), start.elapsed());

    // paint the corners in red on a grayscale copy
    let mut canvas = Image::<u8, 3>::from_size_val(img_gray8.size(), 0)?;
    rgb_from_gray(&img_gray8, &mut canvas)?;
    draw_corners(&mut canvas, &corners, [255, 0, 0], args.marker_radius);

    write_image_png_rgb8(&args.output_path, &canvas)?;
    log::info!("wrote {}", args.output_path.display());

    Ok(())
}
