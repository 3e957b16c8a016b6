//! # Contour Module
//!
//! The per-phase kernels of the marching-squares renderer. Each kernel works on one worker's
//! slice of its phase and knows nothing about threads; the pipeline in
//! [`crate::processing`] decides who runs what and when.
//!
//! - [`rescale`]: bicubic resampling of a band of the target image
//! - [`sample`]: luminance thresholding onto the binary grid
//! - [`march`]: cell classification and tile stamping
//! - [`tiles`]: the 16 contour tiles

pub mod march;
pub mod rescale;
pub mod sample;
pub mod tiles;

pub use march::configuration;
pub use tiles::{CONTOUR_CONFIG_COUNT, ContourTileSet};
