//! # Configuration Module
//!
//! Configuration structures and validation for contour rendering runs. This is the common
//! interface between the command line front end and the core library.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `input` | `String` | Any readable image | Source image path |
//! | `output` | `String` | Any writable path | Output image path, format from extension |
//! | `workers` | `usize` | >= 1 | Worker threads |
//! | `step` | `u32` | >= 1 | Grid step in pixels, also the tile size |
//! | `sigma` | `u8` | 0-255 | Luminance threshold, `<= sigma` is inside |
//! | `max_size` | `Size` | any | Largest input processed as is |
//! | `target_size` | `Size` | non-empty | Working resolution for larger inputs |
//! | `contours` | `String` | directory | Location of `0.ppm` .. `15.ppm` |
//! | `builtin_tiles` | `bool` | | Render tiles instead of loading them |
//!
//! ## Worker Count Format
//!
//! The worker count is given as text on the command line and must parse as a positive
//! integer; `0`, negative numbers and non-numeric values are rejected before any work starts.
//!
//! ## Examples
//!
//! ```rust
//! use marching_contours::config::config::ContourConfig;
//!
//! let config = ContourConfig::new("in.ppm".to_string(), "out.ppm".to_string(), 4);
//! assert!(config.validate().is_ok());
//!
//! let options = config.to_contour_options();
//! assert_eq!(options.pipeline.workers, 4);
//! ```

use std::path::PathBuf;

use contour_scale::plan::{RescalePolicy, Size};

use crate::processing::{DEFAULT_SIGMA, DEFAULT_STEP, PipelineConfig};
use crate::{ContourOptions, TileSource};

/// Default directory of the contour tile assets.
pub const DEFAULT_CONTOUR_DIR: &str = "contours";

/// Configuration for one contour rendering run.
///
/// Holds every user-facing parameter, validates them, and converts to the library's
/// [`ContourOptions`].
///
/// # Examples
///
/// ```rust
/// use marching_contours::config::config::ContourConfig;
///
/// let config = ContourConfig {
///     step: 16,
///     builtin_tiles: true,
///     ..ContourConfig::new("photo.png".to_string(), "contours.png".to_string(), 8)
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContourConfig {
    /// Source image path. Any format the `image` crate decodes.
    pub input: String,

    /// Output image path. The extension selects the encoder.
    pub output: String,

    /// Number of worker threads. Must be greater than 0.
    pub workers: usize,

    /// Grid step in pixels. Loaded tiles are fitted to `step x step`.
    pub step: u32,

    /// Luminance threshold. Pixels with `(r + g + b) / 3 <= sigma` are inside the contour.
    pub sigma: u8,

    /// Inputs larger than this on either axis are rescaled.
    pub max_size: Size,

    /// Resolution oversized inputs are rescaled to.
    pub target_size: Size,

    /// Directory holding the 16 tile assets.
    pub contours: String,

    /// Render the tiles procedurally instead of loading `contours`.
    pub builtin_tiles: bool,
}

impl Default for ContourConfig {
    /// Default values:
    /// - `input`: "input.ppm"
    /// - `output`: "output.ppm"
    /// - `workers`: 1
    /// - `step`: 8
    /// - `sigma`: 200
    /// - `max_size` / `target_size`: 2048x2048
    /// - `contours`: "contours"
    /// - `builtin_tiles`: false
    fn default() -> Self {
        let policy = RescalePolicy::default();
        Self {
            input: "input.ppm".to_string(),
            output: "output.ppm".to_string(),
            workers: 1,
            step: DEFAULT_STEP,
            sigma: DEFAULT_SIGMA,
            max_size: policy.max,
            target_size: policy.target,
            contours: DEFAULT_CONTOUR_DIR.to_string(),
            builtin_tiles: false,
        }
    }
}

impl ContourConfig {
    /// Creates a configuration for the three required parameters, defaults elsewhere.
    pub fn new(input: String, output: String, workers: usize) -> Self {
        Self {
            input,
            output,
            workers,
            ..Self::default()
        }
    }

    /// Parse a worker count given as text.
    pub fn parse_workers(text: &str) -> Result<usize, String> {
        let count: i64 = text
            .trim()
            .parse()
            .map_err(|_| format!("Worker count must be a positive integer, got '{}'", text))?;
        if count < 1 {
            return Err(format!("Worker count must be at least 1, got {}", count));
        }
        usize::try_from(count).map_err(|_| format!("Worker count {} is too large", count))
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("Input path must not be empty".to_string());
        }
        if self.output.is_empty() {
            return Err("Output path must not be empty".to_string());
        }
        if self.workers == 0 {
            return Err("Worker count must be at least 1".to_string());
        }
        if self.step == 0 {
            return Err("Grid step must be greater than 0".to_string());
        }
        if self.target_size.is_empty() {
            return Err(format!(
                "Target size must be non-empty, got {}",
                self.target_size
            ));
        }
        if !self.builtin_tiles && self.contours.is_empty() {
            return Err("Contour tile directory must not be empty".to_string());
        }
        Ok(())
    }

    /// Convert to ContourOptions for use with the contour library
    pub fn to_contour_options(&self) -> ContourOptions {
        ContourOptions {
            input: PathBuf::from(&self.input),
            output: PathBuf::from(&self.output),
            pipeline: PipelineConfig {
                step: self.step,
                sigma: self.sigma,
                policy: RescalePolicy::new(self.max_size, self.target_size),
                workers: self.workers,
            },
            tiles: if self.builtin_tiles {
                TileSource::Builtin
            } else {
                TileSource::Assets(PathBuf::from(&self.contours))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ContourConfig::default();
        assert_eq!(config.step, 8);
        assert_eq!(config.sigma, 200);
        assert_eq!(config.max_size, Size::new(2048, 2048));
        assert_eq!(config.target_size, Size::new(2048, 2048));
        assert_eq!(config.contours, "contours");
        assert!(!config.builtin_tiles);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ContourConfig::new("a.ppm".into(), "b.ppm".into(), 2);
        assert!(config.validate().is_ok());

        config.workers = 0;
        assert!(config.validate().is_err());
        config.workers = 2;

        config.step = 0;
        assert!(config.validate().is_err());
        config.step = 8;

        config.target_size = Size::new(0, 10);
        assert!(config.validate().is_err());
        config.target_size = Size::square(512);

        config.output.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(ContourConfig::parse_workers("4"), Ok(4));
        assert_eq!(ContourConfig::parse_workers(" 16 "), Ok(16));
        assert!(ContourConfig::parse_workers("0").is_err());
        assert!(ContourConfig::parse_workers("-2").is_err());
        assert!(ContourConfig::parse_workers("abc").is_err());
        assert!(ContourConfig::parse_workers("").is_err());
    }

    #[test]
    fn test_to_contour_options() {
        let config = ContourConfig {
            sigma: 90,
            max_size: Size::new(640, 480),
            target_size: Size::new(320, 240),
            ..ContourConfig::new("in.png".into(), "out.png".into(), 3)
        };
        let options = config.to_contour_options();
        assert_eq!(options.pipeline.sigma, 90);
        assert_eq!(options.pipeline.workers, 3);
        assert_eq!(options.pipeline.policy.target, Size::new(320, 240));
        assert_eq!(options.tiles, TileSource::Assets(PathBuf::from("contours")));

        let builtin = ContourConfig {
            builtin_tiles: true,
            ..config
        };
        assert_eq!(builtin.to_contour_options().tiles, TileSource::Builtin);
    }
}
