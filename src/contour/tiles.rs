//! # Contour Tile Set
//!
//! The 16 pre-rendered tiles stamped by the marching pass, one per 4-bit corner
//! configuration. Tiles are loaded once before any worker starts and are read-only for the
//! rest of the run.
//!
//! ## Sources
//!
//! - **Assets**: `<dir>/0.ppm` .. `<dir>/15.ppm`. An asset whose size differs from the grid
//!   step is fitted to `step x step` with `contour_scale::cpu`, with a warning.
//! - **Built-in**: rendered on the fly for any step: white background, black segments between
//!   the midpoints of the edges the contour crosses.
//!
//! ## Corner Bits
//!
//! ```text
//!   bit 3 (8) ── top ── bit 2 (4)
//!      │                  │
//!     left              right
//!      │                  │
//!   bit 0 (1) ─ bottom ─ bit 1 (2)
//! ```
//!
//! A set bit marks a corner inside the contour (dark). The two saddle configurations, 5 and
//! 10, separate the two outside corners.

use std::path::{Path, PathBuf};

use contour_scale::cpu::fit_rgb_cpu;
use contour_scale::plan::Size;
use fast_image_resize::Resizer;

use crate::codec::read_bitmap;
use crate::core::{Bitmap, Pixel};
use crate::error::{ContourError, ContourResult};

/// Number of marching-squares configurations.
pub const CONTOUR_CONFIG_COUNT: usize = 16;

/// Background of built-in tiles.
pub const TILE_BACKGROUND: Pixel = Pixel::WHITE;
/// Contour line colour of built-in tiles.
pub const TILE_INK: Pixel = Pixel::BLACK;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

use Edge::{Bottom, Left, Right, Top};

/// Segments drawn for each configuration.
const SEGMENTS: [&[(Edge, Edge)]; CONTOUR_CONFIG_COUNT] = [
    &[],
    &[(Left, Bottom)],
    &[(Bottom, Right)],
    &[(Left, Right)],
    &[(Top, Right)],
    &[(Left, Top), (Bottom, Right)],
    &[(Top, Bottom)],
    &[(Left, Top)],
    &[(Left, Top)],
    &[(Top, Bottom)],
    &[(Top, Right), (Left, Bottom)],
    &[(Top, Right)],
    &[(Left, Right)],
    &[(Bottom, Right)],
    &[(Left, Bottom)],
    &[],
];

/// Immutable set of 16 square tiles of a common size.
#[derive(Debug, Clone)]
pub struct ContourTileSet {
    tiles: Vec<Bitmap>,
    size: u32,
}

impl ContourTileSet {
    /// Validate and wrap 16 tiles. All tiles must be square, non-empty and the same size.
    pub fn from_tiles(tiles: Vec<Bitmap>) -> ContourResult<Self> {
        if tiles.len() != CONTOUR_CONFIG_COUNT {
            return Err(ContourError::config(
                "tiles",
                tiles.len().to_string(),
                format!("exactly {} contour tiles are required", CONTOUR_CONFIG_COUNT),
            ));
        }
        let size = tiles[0].width();
        for (index, tile) in tiles.iter().enumerate() {
            if tile.is_empty() || tile.width() != size || tile.height() != size {
                return Err(ContourError::asset(
                    index,
                    None,
                    format!(
                        "tile is {}x{}, expected {}x{}",
                        tile.width(),
                        tile.height(),
                        size,
                        size
                    ),
                ));
            }
        }
        Ok(Self { tiles, size })
    }

    /// Path of asset `index` inside `dir`.
    pub fn asset_path(dir: impl AsRef<Path>, index: usize) -> PathBuf {
        dir.as_ref().join(format!("{}.ppm", index))
    }

    /// Load the 16 assets from `dir`, fitting each one to `step x step`.
    pub fn load(dir: impl AsRef<Path>, step: u32) -> ContourResult<Self> {
        let dir = dir.as_ref();
        let target = Size::square(step);
        let mut resizer = Resizer::new();
        let mut tiles = Vec::with_capacity(CONTOUR_CONFIG_COUNT);

        for index in 0..CONTOUR_CONFIG_COUNT {
            let path = Self::asset_path(dir, index);
            let shown = path.display().to_string();
            if !path.is_file() {
                return Err(ContourError::asset(index, Some(shown), "file not found"));
            }
            let tile = read_bitmap(&path)
                .map_err(|e| ContourError::asset(index, Some(shown.clone()), e.to_string()))?;

            if tile.size() == target {
                tiles.push(tile);
                continue;
            }
            log::warn!(
                "contour tile {} is {}, fitting to {}",
                shown,
                tile.size(),
                target
            );
            tiles.push(fit_tile(&mut resizer, &tile, target).map_err(|e| {
                ContourError::asset(index, Some(shown.clone()), e.to_string())
            })?);
        }

        log::debug!("loaded {} contour tiles from {}", tiles.len(), dir.display());
        Self::from_tiles(tiles)
    }

    /// Render the 16 tiles for a `step x step` cell.
    pub fn builtin(step: u32) -> ContourResult<Self> {
        if step == 0 {
            return Err(ContourError::config("step", "0", "tile size must be at least 1"));
        }
        let tiles = (0..CONTOUR_CONFIG_COUNT)
            .map(|config| render_tile(config, step))
            .collect::<ContourResult<Vec<_>>>()?;
        Self::from_tiles(tiles)
    }

    /// Tile for a 4-bit configuration. Only the low four bits are used.
    #[inline]
    pub fn tile(&self, config: u8) -> &Bitmap {
        &self.tiles[(config & 0x0f) as usize]
    }

    /// Side length of every tile.
    pub fn tile_size(&self) -> u32 {
        self.size
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bitmap> {
        self.tiles.iter()
    }
}

fn fit_tile(resizer: &mut Resizer, tile: &Bitmap, target: Size) -> ContourResult<Bitmap> {
    let bytes = tile.to_rgb_bytes()?;
    let fitted = fit_rgb_cpu(resizer, &bytes, tile.size(), target)
        .map_err(|e| ContourError::scale("tile fit", e))?;
    Bitmap::from_rgb_bytes(target.w, target.h, &fitted)
}

fn midpoint(edge: Edge, size: u32) -> (i64, i64) {
    let last = size as i64 - 1;
    let mid = size as i64 / 2;
    match edge {
        Top => (0, mid),
        Right => (mid, last),
        Bottom => (last, mid),
        Left => (mid, 0),
    }
}

fn render_tile(config: usize, size: u32) -> ContourResult<Bitmap> {
    let mut tile = Bitmap::filled(size, size, TILE_BACKGROUND)?;
    for &(from, to) in SEGMENTS[config] {
        draw_line(&mut tile, midpoint(from, size), midpoint(to, size));
    }
    Ok(tile)
}

// Bresenham over (row, col)
fn draw_line(tile: &mut Bitmap, from: (i64, i64), to: (i64, i64)) {
    let (mut r, mut c) = from;
    let dr = (to.0 - r).abs();
    let dc = (to.1 - c).abs();
    let sr = if r < to.0 { 1 } else { -1 };
    let sc = if c < to.1 { 1 } else { -1 };
    let mut err = dc - dr;

    loop {
        tile.set_pixel(r as u32, c as u32, TILE_INK);
        if (r, c) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dr {
            err -= dr;
            c += sc;
        }
        if e2 < dc {
            err += dc;
            r += sr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write_bitmap;

    fn ink_count(tile: &Bitmap) -> usize {
        tile.pixels().iter().filter(|&&px| px == TILE_INK).count()
    }

    #[test]
    fn test_uniform_configs_are_blank() {
        let tiles = ContourTileSet::builtin(8).unwrap();
        assert_eq!(ink_count(tiles.tile(0)), 0);
        assert_eq!(ink_count(tiles.tile(15)), 0);
    }

    #[test]
    fn test_every_crossing_config_has_ink() {
        let tiles = ContourTileSet::builtin(8).unwrap();
        for config in 1..15u8 {
            assert!(ink_count(tiles.tile(config)) > 0, "config {} is blank", config);
        }
    }

    #[test]
    fn test_vertical_crossing_draws_middle_column() {
        // config 6: both right corners inside, boundary runs top to bottom
        let tiles = ContourTileSet::builtin(8).unwrap();
        let tile = tiles.tile(6);
        for row in 0..8 {
            assert_eq!(tile.pixel(row, 4), TILE_INK);
            assert_eq!(tile.pixel(row, 0), TILE_BACKGROUND);
        }
        assert_eq!(ink_count(tile), 8);
    }

    #[test]
    fn test_complementary_configs_match() {
        let tiles = ContourTileSet::builtin(6).unwrap();
        for config in 0..16u8 {
            if config == 5 || config == 10 {
                continue;
            }
            assert_eq!(tiles.tile(config), tiles.tile(15 - config), "config {}", config);
        }
    }

    #[test]
    fn test_from_tiles_validates_shape() {
        let mut tiles = vec![Bitmap::new(4, 4).unwrap(); 16];
        assert!(ContourTileSet::from_tiles(tiles[..15].to_vec()).is_err());
        tiles[9] = Bitmap::new(4, 3).unwrap();
        let err = ContourTileSet::from_tiles(tiles).unwrap_err();
        assert!(matches!(err, ContourError::Asset { index: 9, .. }));
    }

    #[test]
    fn test_load_assets_and_fit() {
        let dir = tempfile::tempdir().unwrap();
        for index in 0..CONTOUR_CONFIG_COUNT {
            // asset 3 is stored at twice the step and must be fitted
            let side = if index == 3 { 8 } else { 4 };
            let tile = Bitmap::filled(side, side, Pixel::gray(index as u8 * 10)).unwrap();
            write_bitmap(&tile, ContourTileSet::asset_path(dir.path(), index)).unwrap();
        }

        let tiles = ContourTileSet::load(dir.path(), 4).unwrap();
        assert_eq!(tiles.tile_size(), 4);
        assert_eq!(tiles.tile(7).pixel(0, 0), Pixel::gray(70));
        assert_eq!(tiles.tile(3).size(), Size::square(4));
    }

    #[test]
    fn test_missing_asset_names_index() {
        let dir = tempfile::tempdir().unwrap();
        for index in 0..5 {
            let tile = Bitmap::new(2, 2).unwrap();
            write_bitmap(&tile, ContourTileSet::asset_path(dir.path(), index)).unwrap();
        }
        let err = ContourTileSet::load(dir.path(), 2).unwrap_err();
        assert!(matches!(err, ContourError::Asset { index: 5, .. }));
    }

    #[test]
    fn test_single_pixel_tiles() {
        let tiles = ContourTileSet::builtin(1).unwrap();
        assert_eq!(tiles.tile(0).pixel(0, 0), TILE_BACKGROUND);
        assert_eq!(tiles.tile(6).pixel(0, 0), TILE_INK);
    }
}
