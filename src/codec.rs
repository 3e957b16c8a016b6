//! Image file I/O.
//!
//! Thin layer over the `image` crate: any format it can decode is accepted as input, and the
//! output format follows the output path's extension (`.ppm`, `.png`, ...). Alpha and higher
//! bit depths are flattened to 8-bit RGB on the way in.

use std::path::Path;

use crate::core::Bitmap;
use crate::error::{ContourError, ContourResult};

/// Decode the image at `path` into a [`Bitmap`].
pub fn read_bitmap(path: impl AsRef<Path>) -> ContourResult<Bitmap> {
    let path = path.as_ref();
    let decoded = image::open(path)
        .map_err(|e| ContourError::image("decode", path.display().to_string(), e))?;
    let rgb = decoded.into_rgb8();
    let (width, height) = rgb.dimensions();
    Bitmap::from_rgb_bytes(width, height, rgb.as_raw())
}

/// Encode `bitmap` to `path`, format chosen from the extension.
pub fn write_bitmap(bitmap: &Bitmap, path: impl AsRef<Path>) -> ContourResult<()> {
    let path = path.as_ref();
    let bytes = bitmap.to_rgb_bytes()?;
    image::save_buffer(
        path,
        &bytes,
        bitmap.width(),
        bitmap.height(),
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| ContourError::image("encode", path.display().to_string(), e))
}
