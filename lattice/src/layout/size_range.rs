//! Min/max size pairs.
//!
//! A [`SizeRange`] flows down the element tree and bounds the size each
//! element may choose. It plays the role Flutter's `BoxConstraints` plays,
//! with `f64::INFINITY` as the "unconstrained" maximum.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::primitives::Size;

/// An inclusive range of acceptable sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: Size,
    pub max: Size,
}

impl SizeRange {
    /// `[0, 0]` on both axes.
    pub const ZERO: Self = Self {
        min: Size::ZERO,
        max: Size::ZERO,
    };

    /// Zero minimum, infinite maximum.
    pub const UNCONSTRAINED: Self = Self {
        min: Size::ZERO,
        max: Size::INFINITY,
    };

    /// Create a validated range.
    ///
    /// Fails if any component is NaN or negative, if a minimum is infinite,
    /// or if `min` exceeds `max` on either axis.
    pub fn new(min: Size, max: Size) -> Result<Self> {
        let valid_min = |v: f64| v.is_finite() && v >= 0.0;
        let valid_max = |v: f64| !v.is_nan() && v >= 0.0;

        if !valid_min(min.width)
            || !valid_min(min.height)
            || !valid_max(max.width)
            || !valid_max(max.height)
            || !min.fits_within(max)
        {
            return Err(LayoutError::InvalidSizeRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Create a range, forcing `min` down to `max` where it exceeds it.
    ///
    /// Negative components are floored at zero. This never fails.
    pub fn normalized(min: Size, max: Size) -> Self {
        let max_width = max.width.max(0.0);
        let max_height = max.height.max(0.0);
        Self {
            min: Size::new(
                min.width.max(0.0).min(max_width),
                min.height.max(0.0).min(max_height),
            ),
            max: Size::new(max_width, max_height),
        }
    }

    /// A range that admits exactly one size.
    pub fn exact(size: Size) -> Self {
        Self::normalized(size, size)
    }

    /// Clamp `size` into this range.
    #[inline]
    pub fn clamp(&self, size: Size) -> Size {
        debug_assert!(!size.width.is_nan(), "NaN width in layout");
        debug_assert!(!size.height.is_nan(), "NaN height in layout");
        Size::new(
            size.width.max(self.min.width).min(self.max.width),
            size.height.max(self.min.height).min(self.max.height),
        )
    }

    /// Intersect `other` with this range.
    ///
    /// `self` is the ancestor: where the two ranges are disjoint on an axis,
    /// the result collapses to the nearest bound of `self`.
    pub fn intersect(&self, other: &SizeRange) -> SizeRange {
        let axis = |lo: f64, hi: f64, other_lo: f64, other_hi: f64| {
            let clamp = |v: f64| v.max(lo).min(hi);
            (clamp(other_lo), clamp(other_hi))
        };
        let (min_width, max_width) =
            axis(self.min.width, self.max.width, other.min.width, other.max.width);
        let (min_height, max_height) =
            axis(self.min.height, self.max.height, other.min.height, other.max.height);
        SizeRange::normalized(
            Size::new(min_width, min_height),
            Size::new(max_width, max_height),
        )
    }

    /// Whether `size` lies inside this range, within `tolerance`.
    pub fn contains(&self, size: Size, tolerance: f64) -> bool {
        size.width >= self.min.width - tolerance
            && size.height >= self.min.height - tolerance
            && size.width <= self.max.width + tolerance
            && size.height <= self.max.height + tolerance
    }

    /// Whether min equals max on both axes.
    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::UNCONSTRAINED
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<SizeRange: min={}, max={}>", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_range() {
        let err = SizeRange::new(Size::new(10.0, 0.0), Size::new(5.0, 5.0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidSizeRange { .. }));
    }

    #[test]
    fn test_new_accepts_infinite_max() {
        assert!(SizeRange::new(Size::ZERO, Size::INFINITY).is_ok());
        assert!(SizeRange::new(Size::INFINITY, Size::INFINITY).is_err());
    }

    #[test]
    fn test_normalized_max_wins() {
        let range = SizeRange::normalized(Size::new(300.0, 10.0), Size::new(200.0, 20.0));
        assert_eq!(range.min, Size::new(200.0, 10.0));
        assert_eq!(range.max, Size::new(200.0, 20.0));
    }

    #[test]
    fn test_clamp() {
        let range = SizeRange::new(Size::new(10.0, 10.0), Size::new(100.0, 50.0)).unwrap();
        assert_eq!(range.clamp(Size::new(5.0, 60.0)), Size::new(10.0, 50.0));
        assert_eq!(range.clamp(Size::new(50.0, 20.0)), Size::new(50.0, 20.0));
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = SizeRange::new(Size::new(0.0, 0.0), Size::new(100.0, 100.0)).unwrap();
        let b = SizeRange::new(Size::new(50.0, 20.0), Size::new(200.0, 80.0)).unwrap();
        let r = a.intersect(&b);
        assert_eq!(r.min, Size::new(50.0, 20.0));
        assert_eq!(r.max, Size::new(100.0, 80.0));
    }

    #[test]
    fn test_intersect_disjoint_ancestor_wins() {
        let ancestor = SizeRange::new(Size::ZERO, Size::new(100.0, 100.0)).unwrap();
        let child = SizeRange::exact(Size::new(300.0, 300.0));
        let r = ancestor.intersect(&child);
        assert_eq!(r, SizeRange::exact(Size::new(100.0, 100.0)));
    }

    #[test]
    fn test_contains_with_tolerance() {
        let range = SizeRange::exact(Size::new(10.0, 10.0));
        assert!(range.contains(Size::new(10.0 + 1e-9, 10.0), 1e-6));
        assert!(!range.contains(Size::new(11.0, 10.0), 1e-6));
    }
}
