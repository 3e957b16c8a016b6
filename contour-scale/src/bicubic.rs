// SPDX-License-Identifier: MIT
//! # Bicubic Point Sampler
//!
//! Interpolates a continuous RGB colour from a raster at normalized coordinates.
//!
//! `u` runs along the columns and `v` along the rows, both in `[0, 1]`. Pixel centres sit at
//! half-pixel offsets, so `(0, 0)` and `(1, 1)` land half a pixel outside the first and last
//! centres and are resolved by edge clamping. Each channel is interpolated with a Catmull-Rom
//! cubic Hermite spline over the 4x4 neighbourhood, first along the rows, then across them,
//! and the result is clamped back into `0..=255`.

use crate::plan::Size;

/// Read access to a packed RGB raster.
///
/// Implemented by the pipeline's bitmap type; kept as a trait so this crate does not depend
/// on it. Coordinates passed to [`RgbSource::rgb`] are always inside [`RgbSource::size`].
pub trait RgbSource {
    fn size(&self) -> Size;
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

/// Catmull-Rom cubic through `b` (t = 0) and `c` (t = 1), with `a` and `d` as outer tangents.
#[inline]
fn cubic_hermite(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let c3 = -a / 2.0 + (3.0 * b) / 2.0 - (3.0 * c) / 2.0 + d / 2.0;
    let c2 = a - (5.0 * b) / 2.0 + 2.0 * c - d / 2.0;
    let c1 = -a / 2.0 + c / 2.0;
    let c0 = b;
    ((c3 * t + c2) * t + c1) * t + c0
}

#[inline]
fn clamped<S: RgbSource + ?Sized>(src: &S, x: i64, y: i64) -> [u8; 3] {
    let size = src.size();
    let x = x.clamp(0, size.w as i64 - 1) as u32;
    let y = y.clamp(0, size.h as i64 - 1) as u32;
    src.rgb(x, y)
}

/// Sample `src` at normalized coordinates `(u, v)`.
///
/// `src` must not be empty. Coordinates outside `[0, 1]` are accepted and clamp to the edge.
pub fn sample_bicubic<S: RgbSource + ?Sized>(src: &S, u: f32, v: f32) -> [u8; 3] {
    let size = src.size();
    debug_assert!(!size.is_empty(), "bicubic sampling of an empty raster");

    let x = u * size.w as f32 - 0.5;
    let y = v * size.h as f32 - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;
    let (xi, yi) = (x0 as i64, y0 as i64);

    // 4x4 neighbourhood, rows outer
    let mut taps = [[[0u8; 3]; 4]; 4];
    for (m, row) in taps.iter_mut().enumerate() {
        for (k, tap) in row.iter_mut().enumerate() {
            *tap = clamped(src, xi + k as i64 - 1, yi + m as i64 - 1);
        }
    }

    let mut out = [0u8; 3];
    for (ch, slot) in out.iter_mut().enumerate() {
        let mut col = [0f32; 4];
        for (m, row) in taps.iter().enumerate() {
            col[m] = cubic_hermite(
                row[0][ch] as f32,
                row[1][ch] as f32,
                row[2][ch] as f32,
                row[3][ch] as f32,
                tx,
            );
        }
        let value = cubic_hermite(col[0], col[1], col[2], col[3], ty);
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}
