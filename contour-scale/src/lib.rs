// SPDX-License-Identifier: MIT
//! # contour-scale: Resampling Primitives for the Contour Renderer
//!
//! This crate holds the resampling pieces the contour pipeline treats as collaborators:
//! deciding whether an input must be brought to a fixed working resolution, sampling a
//! continuous colour out of a raster at normalized coordinates, and fitting small tile
//! assets to the grid step.
//!
//! ## Key Components
//!
//! - [`plan`]: Rescale policy and plan computation (when to rescale, and to what size)
//! - [`bicubic`]: Point-wise bicubic sampler over any [`bicubic::RgbSource`]
//! - [`cpu`]: Whole-image RGB8 resize built on fast_image_resize (SIMD-accelerated)
//!
//! ## Why point-wise sampling?
//!
//! The pipeline splits the destination image between worker threads, so every worker has to
//! be able to compute any single destination pixel on its own. [`bicubic::sample_bicubic`]
//! therefore takes one normalized `(u, v)` pair and returns one colour, with no state shared
//! between calls.
//!
//! ## Usage Example
//!
//! ```rust
//! use contour_scale::plan::{build_plan, RescalePolicy, Size};
//!
//! let policy = RescalePolicy::square(2048);
//! let plan = build_plan(Size { w: 4096, h: 3072 }, policy);
//! assert!(plan.rescale);
//! assert_eq!(plan.out, Size { w: 2048, h: 2048 });
//! ```

pub mod bicubic;
pub mod cpu;
pub mod plan;
