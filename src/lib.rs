//! # Marching Contours Library
//!
//! Renders luminance contour lines onto raster images with the marching-squares algorithm,
//! spread across a fixed pool of worker threads.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `core`: bitmap, binary grid, shared canvas, rendezvous barrier and work partitioner
//! - `contour`: per-phase kernels (rescale, sample, march) and the contour tile set
//! - `processing`: the barrier-synchronized parallel pipeline
//! - `config`: configuration management and validation
//! - `codec`: image file I/O through the `image` crate
//! - `error`: the crate's error type
//!
//! Resolution planning and bicubic sampling live in the `contour-scale` workspace crate.
//!
//! ## Pipeline
//!
//! 1. Oversized inputs are resampled to a fixed working resolution
//! 2. The image is thresholded on a `step`-spaced grid: dark is inside, bright is outside
//! 3. Every grid cell is classified by its four corners and the matching tile is stamped
//!
//! ## Example
//!
//! ```rust,no_run
//! use marching_contours::{ContourOptions, TileSource, run_contour};
//! use marching_contours::processing::PipelineConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let options = ContourOptions {
//!     input: "photo.png".into(),
//!     output: "contours.png".into(),
//!     pipeline: PipelineConfig {
//!         workers: 4,
//!         ..PipelineConfig::default()
//!     },
//!     tiles: TileSource::Builtin,
//! };
//!
//! let report = run_contour(&options)?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

// Standard library imports
use std::path::PathBuf;

// External crate imports
use anyhow::{Context, Result};

// Internal module imports
pub mod codec;
pub mod config;
pub mod contour;
pub mod core;
pub mod error;
pub mod processing;

/// Re-export error types for convenience
pub use error::{ContourError, ContourResult};

pub use contour::ContourTileSet;
pub use crate::core::{Bitmap, Pixel};
pub use processing::{ParallelPipeline, PipelineConfig, PipelineReport};

/// Where the 16 contour tiles come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSource {
    /// `0.ppm` .. `15.ppm` inside this directory.
    Assets(PathBuf),
    /// Tiles rendered for the configured step.
    Builtin,
}

impl TileSource {
    /// Load or render the tile set for `step`.
    pub fn load(&self, step: u32) -> ContourResult<ContourTileSet> {
        match self {
            TileSource::Assets(dir) => ContourTileSet::load(dir, step),
            TileSource::Builtin => ContourTileSet::builtin(step),
        }
    }
}

/// Options for one contour rendering run.
///
/// # Examples
///
/// ```rust
/// use marching_contours::{ContourOptions, TileSource};
/// use marching_contours::processing::PipelineConfig;
///
/// let options = ContourOptions {
///     input: "in.ppm".into(),
///     output: "out.ppm".into(),
///     pipeline: PipelineConfig::default(),
///     tiles: TileSource::Assets("contours".into()),
/// };
/// assert_eq!(options.pipeline.step, 8);
/// ```
#[derive(Debug, Clone)]
pub struct ContourOptions {
    /// Image to read.
    pub input: PathBuf,

    /// Image to write. The extension selects the format; nothing is written on failure.
    pub output: PathBuf,

    /// Grid, threshold, rescale and worker settings.
    pub pipeline: PipelineConfig,

    /// Contour tile source. Tiles must end up `step x step`.
    pub tiles: TileSource,
}

/// Main entry point: read, render and write one image.
///
/// The tile set and the input image are loaded before any worker starts. The output file
/// is only created once every worker has finished successfully.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration is invalid
/// - the input image or a tile asset cannot be read
/// - an allocation fails or a worker cannot be started
/// - the output image cannot be written
pub fn run_contour(options: &ContourOptions) -> Result<PipelineReport> {
    options.pipeline.validate()?;
    let tiles = options
        .tiles
        .load(options.pipeline.step)
        .context("loading contour tiles")?;
    let pipeline = ParallelPipeline::new(options.pipeline.clone(), &tiles)?;

    let image = codec::read_bitmap(&options.input)?;
    log::info!("Input: {} ({})", options.input.display(), image.size());

    let (rendered, report) = pipeline.run(image)?;
    codec::write_bitmap(&rendered, &options.output)?;
    log::info!("Output: {} ({})", options.output.display(), rendered.size());
    Ok(report)
}
