//! # Processing Module
//!
//! The multi-threaded contour rendering pipeline.

pub mod pipeline;

// Re-export commonly used types for convenience
pub use pipeline::{DEFAULT_SIGMA, DEFAULT_STEP, ParallelPipeline, PipelineConfig, PipelineReport};
