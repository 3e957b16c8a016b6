//! Grid sampling: luminance thresholding of the active image on the `step` lattice.
//!
//! Interior cells `(i, j)` with `i < P`, `j < Q` sample pixel `(i * step, j * step)`. The last
//! column `j = Q` samples the image's rightmost column and the last row `i = P` its bottom
//! row, so the outer ring of cells always reaches the image border.

use std::ops::Range;

use crate::core::grid::store;
use crate::core::{BinaryGrid, Bitmap, Pixel};
use crate::error::ContourResult;

/// Dark pixels are inside the contour.
#[inline]
pub fn is_inside(px: Pixel, sigma: u8) -> bool {
    px.luminance() <= sigma
}

/// Fill grid rows `rows` (a sub-range of `[0, P)`), including their last-column cell.
pub fn sample_rows(
    grid: &BinaryGrid,
    image: &Bitmap,
    step: u32,
    sigma: u8,
    rows: Range<usize>,
) -> ContourResult<()> {
    let q = grid.cols() - 1;
    let right = image.width() - 1;
    for i in rows {
        let cells = grid.row(i)?;
        let pixels = image.row(i as u32 * step);
        for j in 0..q {
            store(cells, j, is_inside(pixels[j * step as usize], sigma));
        }
        store(cells, q, is_inside(pixels[right as usize], sigma));
    }
    Ok(())
}

/// Fill cells `cols` (a sub-range of `[0, Q]`) of the last grid row `P`.
///
/// Cell `Q` is the bottom-right corner of the image.
pub fn sample_last_row(
    grid: &BinaryGrid,
    image: &Bitmap,
    step: u32,
    sigma: u8,
    cols: Range<usize>,
) -> ContourResult<()> {
    let p = grid.rows() - 1;
    let q = grid.cols() - 1;
    let cells = grid.row(p)?;
    let pixels = image.row(image.height() - 1);
    for j in cols {
        let col = if j == q {
            image.width() as usize - 1
        } else {
            j * step as usize
        };
        store(cells, j, is_inside(pixels[col], sigma));
    }
    Ok(())
}
