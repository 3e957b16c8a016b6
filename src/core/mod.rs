//! # Core Infrastructure Module
//!
//! The data structures and synchronization primitives the contour pipeline is built on:
//! the bitmap, the shared active-image slot, the binary grid, the rendezvous barrier and
//! the static work partitioner.

pub mod bitmap;
pub mod canvas;
pub mod grid;
pub mod partition;
pub mod rendezvous;

pub use bitmap::{Bitmap, Pixel};
pub use grid::BinaryGrid;
pub use partition::partition;
pub use rendezvous::{Aborted, Rendezvous};
