//! # Configuration Module
//!
//! This module provides the configuration structure for contour rendering runs.

pub mod config;

pub use config::{ContourConfig, DEFAULT_CONTOUR_DIR};
