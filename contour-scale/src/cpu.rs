// SPDX-License-Identifier: MIT
// CPU scaler built on fast_image_resize (SIMD-accelerated).
// RGB8 in → RGB8 out, direct write into a freshly sized dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x3;
use fir::{ResizeOptions, Resizer};

use crate::plan::Size;

#[derive(Debug)]
pub enum ScaleError {
    BufferTooSmall { expected: usize, actual: usize },
    EmptyImage,
    Alloc(std::collections::TryReserveError),
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }
impl From<std::collections::TryReserveError> for ScaleError { fn from(e: std::collections::TryReserveError) -> Self { Self::Alloc(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::BufferTooSmall { expected, actual } => {
                write!(f, "Source buffer too small: expected {} bytes, got {}", expected, actual)
            }
            ScaleError::EmptyImage => write!(f, "Cannot resize an empty image"),
            ScaleError::Alloc(e) => write!(f, "Output allocation failed: {}", e),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Alloc(e) => Some(e),
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Resize a tightly packed RGB8 buffer to `dst` and return the new buffer.
///
/// Uses Catmull-Rom convolution, the same kernel family as [`crate::bicubic`], so fitted
/// tiles look like what the point sampler would produce. When `src` already has the
/// requested size the bytes are copied through unchanged.
pub fn fit_rgb_cpu(
    resizer: &mut Resizer,
    src_rgb: &[u8],
    src: Size,
    dst: Size,
) -> Result<Vec<u8>, ScaleError> {
    if src.is_empty() || dst.is_empty() {
        return Err(ScaleError::EmptyImage);
    }
    let src_len = src.area() * 3;
    if src_rgb.len() < src_len {
        return Err(ScaleError::BufferTooSmall {
            expected: src_len,
            actual: src_rgb.len(),
        });
    }

    let dst_len = dst.area() * 3;
    let mut out = Vec::new();
    out.try_reserve_exact(dst_len)?;

    if src == dst {
        out.extend_from_slice(&src_rgb[..src_len]);
        return Ok(out);
    }
    out.resize(dst_len, 0);

    let src_view = TypedImageRef::<U8x3>::from_buffer(src.w, src.h, &src_rgb[..src_len])?;
    let mut dst_image = TypedImage::<U8x3>::from_buffer(dst.w, dst.h, out.as_mut_slice())?;

    let opts = ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::CatmullRom))
        .use_alpha(false);
    resizer.resize_typed::<U8x3>(&src_view, &mut dst_image, &opts)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_size_is_passthrough() {
        let mut resizer = Resizer::new();
        let size = Size::new(2, 2);
        let src: Vec<u8> = (0..12).collect();
        let out = fit_rgb_cpu(&mut resizer, &src, size, size).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_uniform_upscale_stays_uniform() {
        let mut resizer = Resizer::new();
        let src = [40u8, 80, 120].repeat(16);
        let out = fit_rgb_cpu(&mut resizer, &src, Size::square(4), Size::square(8)).unwrap();
        assert_eq!(out.len(), 8 * 8 * 3);
        // fixed-point convolution may round by one step
        for px in out.chunks_exact(3) {
            for (got, want) in px.iter().zip([40u8, 80, 120]) {
                assert!(got.abs_diff(want) <= 1, "{} vs {}", got, want);
            }
        }
    }

    #[test]
    fn test_short_source_is_rejected() {
        let mut resizer = Resizer::new();
        let err = fit_rgb_cpu(&mut resizer, &[0u8; 5], Size::square(2), Size::square(4));
        assert!(matches!(err, Err(ScaleError::BufferTooSmall { expected: 12, actual: 5 })));
    }

    #[test]
    fn test_empty_sizes_are_rejected() {
        let mut resizer = Resizer::new();
        let err = fit_rgb_cpu(&mut resizer, &[], Size::new(0, 3), Size::square(4));
        assert!(matches!(err, Err(ScaleError::EmptyImage)));
    }
}
