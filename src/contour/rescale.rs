//! Bicubic resampling of one horizontal band of the rescale target.

use std::ops::Range;

use contour_scale::bicubic::sample_bicubic;
use contour_scale::plan::Size;

use crate::core::{Bitmap, Pixel};

/// Normalized coordinate of destination index `index` along an axis of `len` samples.
///
/// The first and last samples map to 0 and 1; a single-sample axis maps to 0.
#[inline]
pub fn normalized(index: u32, len: u32) -> f32 {
    if len <= 1 {
        0.0
    } else {
        index as f32 / (len - 1) as f32
    }
}

/// Fill `band`, holding target rows `rows` of a `target`-sized image, from `source`.
pub fn rescale_band(source: &Bitmap, band: &mut [Pixel], target: Size, rows: Range<u32>) {
    let width = target.w as usize;
    for (offset, row) in rows.enumerate() {
        let v = normalized(row, target.h);
        let line = &mut band[offset * width..(offset + 1) * width];
        for (col, px) in line.iter_mut().enumerate() {
            let u = normalized(col as u32, target.w);
            *px = Pixel::from(sample_bicubic(source, u, v));
        }
    }
}
