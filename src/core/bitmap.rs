//! # Bitmap
//!
//! In-memory RGB raster shared by every stage of the pipeline.
//!
//! Pixels are stored row-major: `pixels[row * width + col]`. The grid and the contour tiles
//! use the same orientation, so a grid index `(i, j)` maps to the pixel at row `i * step`,
//! column `j * step`.

use contour_scale::bicubic::RgbSource;
use contour_scale::plan::Size;

use crate::error::{ContourError, ContourResult, try_alloc};

/// A single RGB pixel. No alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub const WHITE: Pixel = Pixel::gray(255);
    pub const BLACK: Pixel = Pixel::gray(0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Average of the three channels, truncated.
    #[inline]
    pub fn luminance(&self) -> u8 {
        ((self.red as u16 + self.green as u16 + self.blue as u16) / 3) as u8
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl From<Pixel> for [u8; 3] {
    fn from(px: Pixel) -> Self {
        [px.red, px.green, px.blue]
    }
}

/// Owned row-major RGB raster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Bitmap {
    /// Allocate a `width x height` bitmap filled with `fill`.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn filled(width: u32, height: u32, fill: Pixel) -> ContourResult<Self> {
        let len = width as usize * height as usize;
        let mut pixels = try_alloc("bitmap pixels", len)?;
        pixels.resize(len, fill);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocate a black `width x height` bitmap.
    pub fn new(width: u32, height: u32) -> ContourResult<Self> {
        Self::filled(width, height, Pixel::BLACK)
    }

    /// Wrap an existing pixel buffer. The buffer length must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> ContourResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ContourError::config(
                "pixels",
                pixels.len().to_string(),
                format!("expected {} pixels for a {}x{} bitmap", expected, width, height),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a bitmap by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Pixel,
    ) -> ContourResult<Self> {
        let mut pixels = try_alloc("bitmap pixels", width as usize * height as usize)?;
        for row in 0..height {
            for col in 0..width {
                pixels.push(f(row, col));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixel(&self, row: u32, col: u32) -> Pixel {
        self.pixels[row as usize * self.width as usize + col as usize]
    }

    #[inline]
    pub fn set_pixel(&mut self, row: u32, col: u32, px: Pixel) {
        let idx = row as usize * self.width as usize + col as usize;
        self.pixels[idx] = px;
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// One row of pixels.
    pub fn row(&self, row: u32) -> &[Pixel] {
        let start = row as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Packed RGB8 bytes, row-major.
    pub fn to_rgb_bytes(&self) -> ContourResult<Vec<u8>> {
        let mut bytes = try_alloc("rgb buffer", self.pixels.len() * 3)?;
        for px in &self.pixels {
            bytes.extend_from_slice(&[px.red, px.green, px.blue]);
        }
        Ok(bytes)
    }

    /// Build a bitmap from packed RGB8 bytes.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> ContourResult<Self> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(ContourError::config(
                "rgb bytes",
                bytes.len().to_string(),
                format!("expected {} bytes for a {}x{} bitmap", expected, width, height),
            ));
        }
        let mut pixels = try_alloc("bitmap pixels", width as usize * height as usize)?;
        pixels.extend(
            bytes
                .chunks_exact(3)
                .map(|c| Pixel::new(c[0], c[1], c[2])),
        );
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

impl RgbSource for Bitmap {
    fn size(&self) -> Size {
        Bitmap::size(self)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixel(y, x).into()
    }
}

/// Copy `tile` into a row-major band of pixels `width` wide, with the tile's top-left corner
/// at `(row, col)` relative to the band.
///
/// Direct copy, no blending. The tile must fit inside the band.
#[inline]
pub fn stamp(band: &mut [Pixel], width: u32, tile: &Bitmap, row: u32, col: u32) {
    let width = width as usize;
    let tile_w = tile.width as usize;
    for r in 0..tile.height {
        let dst = (row + r) as usize * width + col as usize;
        band[dst..dst + tile_w].copy_from_slice(tile.row(r));
    }
}
