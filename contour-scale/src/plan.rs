// SPDX-License-Identifier: MIT
//! # Rescale Planning
//!
//! Decides whether an input raster has to be brought to the fixed working resolution before
//! contour extraction, and what the resulting size is.
//!
//! ## Policy
//!
//! A [`RescalePolicy`] carries two sizes:
//! 1. **max**: the largest resolution processed as-is
//! 2. **target**: the fixed resolution an oversized input is resampled to
//!
//! The comparison is strict on each axis: an input exactly at `max` is kept, one pixel beyond
//! on either axis triggers the rescale. The target does not preserve the aspect ratio; the
//! grid lattice is square, so the working image is too.

use std::fmt;
use std::str::FromStr;

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Square size with both sides equal to `side`.
    pub const fn square(side: u32) -> Self {
        Self { w: side, h: side }
    }

    /// Number of pixels covered by this size.
    pub fn area(&self) -> usize {
        self.w as usize * self.h as usize
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Error returned when a `WxH` size string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError {
    input: String,
}

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid size '{}': expected WIDTHxHEIGHT (e.g. 2048x1536) or a single side length",
            self.input
        )
    }
}

impl std::error::Error for ParseSizeError {}

impl FromStr for Size {
    type Err = ParseSizeError;

    /// Parses `"2048x1536"`, `"2048X1536"` or a bare `"2048"` (square).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        match trimmed.split_once(|c: char| c == 'x' || c == 'X') {
            Some((w, h)) => {
                let w = w.trim().parse::<u32>().map_err(|_| err())?;
                let h = h.trim().parse::<u32>().map_err(|_| err())?;
                Ok(Size { w, h })
            }
            None => trimmed.parse::<u32>().map(Size::square).map_err(|_| err()),
        }
    }
}

/// When to rescale, and to what.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RescalePolicy {
    /// Largest input processed without resampling.
    pub max: Size,
    /// Fixed working resolution for oversized inputs.
    pub target: Size,
}

impl RescalePolicy {
    pub const fn new(max: Size, target: Size) -> Self {
        Self { max, target }
    }

    /// Policy whose threshold and target are the same square resolution.
    pub const fn square(side: u32) -> Self {
        Self {
            max: Size::square(side),
            target: Size::square(side),
        }
    }
}

impl Default for RescalePolicy {
    fn default() -> Self {
        Self::square(2048)
    }
}

/// Complete rescale decision computed from an input size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RescalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Dimensions of the working image after the (possibly skipped) rescale
    pub out: Size,
    /// Whether a resampling pass is required
    pub rescale: bool,
}

/// Compute the rescale plan for an input of the given size.
///
/// # Performance
/// O(1), two comparisons.
pub fn build_plan(input: Size, policy: RescalePolicy) -> RescalePlan {
    if exceeds(input, policy.max) {
        RescalePlan {
            input,
            out: policy.target,
            rescale: true,
        }
    } else {
        RescalePlan {
            input,
            out: input,
            rescale: false,
        }
    }
}

#[inline]
fn exceeds(input: Size, max: Size) -> bool {
    input.w > max.w || input.h > max.h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_at_threshold_is_kept() {
        let plan = build_plan(Size::new(2048, 2048), RescalePolicy::default());
        assert!(!plan.rescale);
        assert_eq!(plan.out, Size::new(2048, 2048));
    }

    #[test]
    fn test_plan_one_pixel_beyond_rescales() {
        let policy = RescalePolicy::default();

        let wide = build_plan(Size::new(2049, 100), policy);
        assert!(wide.rescale);
        assert_eq!(wide.out, Size::square(2048));

        let tall = build_plan(Size::new(100, 2049), policy);
        assert!(tall.rescale);
        assert_eq!(tall.out, Size::square(2048));
    }

    #[test]
    fn test_plan_small_input_untouched() {
        let plan = build_plan(Size::new(640, 480), RescalePolicy::default());
        assert_eq!(plan.input, plan.out);
        assert!(!plan.rescale);
    }

    #[test]
    fn test_plan_uses_custom_target() {
        let policy = RescalePolicy::new(Size::new(64, 32), Size::new(48, 24));
        let plan = build_plan(Size::new(65, 10), policy);
        assert_eq!(plan.out, Size::new(48, 24));
    }

    #[test]
    fn test_size_parsing() {
        assert_eq!("2048x1536".parse::<Size>().unwrap(), Size::new(2048, 1536));
        assert_eq!("64X32".parse::<Size>().unwrap(), Size::new(64, 32));
        assert_eq!(" 512 ".parse::<Size>().unwrap(), Size::square(512));
        assert!("x12".parse::<Size>().is_err());
        assert!("12x".parse::<Size>().is_err());
        assert!("big".parse::<Size>().is_err());
    }
}
