use anyhow::Result;
use clap::{ArgAction, Parser};
use contour_scale::plan::Size;
use log::LevelFilter;
use marching_contours::config::{ContourConfig, DEFAULT_CONTOUR_DIR};
use marching_contours::processing::{DEFAULT_SIGMA, DEFAULT_STEP};

/// Marching-squares contour renderer:
/// - dark regions (luminance <= sigma) are inside, bright regions outside
/// - one pre-rendered tile per grid cell, chosen by its four corners
#[derive(Parser, Debug)]
#[command(name = "contour")]
#[command(about = "Draw luminance contour lines over an image with marching squares")]
#[command(long_about = "Draw luminance contour lines over an image with marching squares.
The image is thresholded on a regular grid and every grid cell is overwritten with the contour
tile matching its four corners. Work is split across a fixed number of worker threads.")]
struct Args {
    /// Source image path
    #[arg(help = "Input image (PPM, PNG, or any format the image crate decodes)")]
    input: String,

    /// Output image path
    #[arg(help = "Output image, format chosen from the extension")]
    output: String,

    /// Worker thread count
    #[arg(allow_hyphen_values = true, help = "Number of worker threads (positive integer)")]
    workers: String,

    /// Grid step in pixels
    #[arg(long, default_value_t = DEFAULT_STEP, help = "Grid step in pixels, also the tile size")]
    step: u32,

    /// Luminance threshold
    #[arg(long, default_value_t = DEFAULT_SIGMA,
          help = "Luminance threshold: (r + g + b) / 3 <= sigma is inside the contour")]
    sigma: u8,

    /// Rescale threshold
    #[arg(long, default_value = "2048x2048",
          help = "Inputs larger than WxH on either axis are rescaled")]
    max_size: Size,

    /// Rescale target
    #[arg(long, default_value = "2048x2048", help = "Resolution oversized inputs are rescaled to")]
    target_size: Size,

    /// Tile asset directory
    #[arg(long, default_value = DEFAULT_CONTOUR_DIR,
          help = "Directory holding the contour tiles 0.ppm .. 15.ppm")]
    contours: String,

    /// Use generated tiles
    #[arg(long, help = "Render the contour tiles instead of loading them")]
    builtin_tiles: bool,

    /// Verbosity
    #[arg(short, long, action = ArgAction::Count, help = "More log output (-v info, -vv debug)")]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let workers = ContourConfig::parse_workers(&args.workers).map_err(anyhow::Error::msg)?;

    let config = ContourConfig {
        step: args.step,
        sigma: args.sigma,
        max_size: args.max_size,
        target_size: args.target_size,
        contours: args.contours,
        builtin_tiles: args.builtin_tiles,
        ..ContourConfig::new(args.input, args.output, workers)
    };

    config.validate().map_err(anyhow::Error::msg)?;
    let options = config.to_contour_options();
    let report = marching_contours::run_contour(&options)?;
    log::info!("Rendered {}", report);
    Ok(())
}

/// Warnings by default; `RUST_LOG` and `-v` raise it.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_env("RUST_LOG");
    let _ = builder.try_init();
}
