//! Common test utilities and helpers for the contour library tests
//!
//! Image builders, tile sets with recognisable colours, and scratch directories holding tile
//! assets on disk.

#![allow(dead_code)]

use std::path::Path;

use marching_contours::codec::write_bitmap;
use marching_contours::contour::tiles::CONTOUR_CONFIG_COUNT;
use marching_contours::processing::PipelineConfig;
use marching_contours::{Bitmap, ContourTileSet, Pixel};

/// Gray level tile `k` is filled with in [`indexed_tiles`].
pub fn tile_shade(config: u8) -> Pixel {
    Pixel::gray(config * 16)
}

/// Tile set where tile `k` is a solid `step x step` square of [`tile_shade`]`(k)`.
pub fn indexed_tiles(step: u32) -> ContourTileSet {
    let tiles = (0..CONTOUR_CONFIG_COUNT as u8)
        .map(|k| Bitmap::filled(step, step, tile_shade(k)).expect("tile"))
        .collect();
    ContourTileSet::from_tiles(tiles).expect("tile set")
}

/// Write `tiles` as `0.ppm` .. `15.ppm` into `dir`.
pub fn write_tiles(dir: &Path, tiles: &ContourTileSet) {
    for (index, tile) in tiles.iter().enumerate() {
        write_bitmap(tile, ContourTileSet::asset_path(dir, index)).expect("write tile");
    }
}

pub fn config(step: u32, workers: usize) -> PipelineConfig {
    PipelineConfig {
        step,
        workers,
        ..PipelineConfig::default()
    }
}

/// Bright or dark uniform image.
pub fn uniform(width: u32, height: u32, px: Pixel) -> Bitmap {
    Bitmap::filled(width, height, px).expect("uniform image")
}

/// Dark disc on a bright background, with a diagonal gradient so that the rescaler has
/// something to interpolate.
pub fn disc(width: u32, height: u32) -> Bitmap {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = width.min(height) as f32 / 3.0;
    Bitmap::from_fn(width, height, |row, col| {
        let (dx, dy) = (col as f32 - cx, row as f32 - cy);
        if dx * dx + dy * dy <= radius * radius {
            Pixel::new(20, 30, 40)
        } else {
            let shade = 210 + ((row + col) % 40) as u8;
            Pixel::new(shade, shade, 250)
        }
    })
    .expect("disc image")
}

/// Interior of one shade, one-pixel border of another.
pub fn bordered(width: u32, height: u32, interior: Pixel, border: Pixel) -> Bitmap {
    Bitmap::from_fn(width, height, |row, col| {
        if row == 0 || col == 0 || row == height - 1 || col == width - 1 {
            border
        } else {
            interior
        }
    })
    .expect("bordered image")
}
