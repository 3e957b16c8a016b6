//! Marching pass: classify each grid cell and stamp its tile.

use std::ops::Range;

use crate::core::BinaryGrid;
use crate::core::Pixel;
use crate::core::bitmap::stamp;
use crate::core::grid::load;
use crate::error::ContourResult;

use super::tiles::ContourTileSet;

/// 4-bit configuration of a cell from its corners.
///
/// Weights are 8, 4, 2, 1 for top-left, top-right, bottom-right, bottom-left.
#[inline]
pub fn configuration(top_left: bool, top_right: bool, bottom_right: bool, bottom_left: bool) -> u8 {
    (top_left as u8) << 3 | (top_right as u8) << 2 | (bottom_right as u8) << 1 | bottom_left as u8
}

/// Stamp the tiles of grid rows `rows` into `band`.
///
/// `band` holds image rows `rows.start * step .. rows.end * step` of an image `width` pixels
/// wide. Grid rows `rows.start ..= rows.end` must be fully sampled.
pub fn march_band(
    grid: &BinaryGrid,
    tiles: &ContourTileSet,
    band: &mut [Pixel],
    width: u32,
    step: u32,
    rows: Range<usize>,
) -> ContourResult<()> {
    let q = grid.cols() - 1;
    for i in rows.clone() {
        let top = grid.row(i)?;
        let bottom = grid.row(i + 1)?;
        let origin = (i - rows.start) as u32 * step;
        for j in 0..q {
            let config = configuration(
                load(top, j),
                load(top, j + 1),
                load(bottom, j + 1),
                load(bottom, j),
            );
            stamp(band, width, tiles.tile(config), origin, j as u32 * step);
        }
    }
    Ok(())
}
