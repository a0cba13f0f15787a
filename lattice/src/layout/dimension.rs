//! Dimensions and size constraints.
//!
//! A [`Dimension`] is the atomic unit of every size expression: "no opinion",
//! an absolute amount of points, or a fraction of the parent's extent.
//! [`SizeConstraints`] groups the six dimensions attached to every element and
//! resolves them into a concrete [`SizeRange`] once the parent size is known.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::size_range::SizeRange;
use crate::error::{LayoutError, Result};
use crate::primitives::Size;

/// A length relative to constraints provided later.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "DimensionRepr", into = "DimensionRepr")]
pub enum Dimension {
    /// No opinion. Resolves to whatever default the caller supplies.
    #[default]
    Auto,
    /// An absolute amount. `f64::INFINITY` means unbounded.
    Points(f64),
    /// Multiplied by the parent's extent on the same axis.
    Fraction(f64),
}

impl Dimension {
    /// Resolve against a parent extent.
    ///
    /// `Auto` yields `auto`. `Fraction` needs a defined `parent_extent` and
    /// fails with [`LayoutError::UnresolvedParentExtent`] otherwise.
    #[inline]
    pub fn resolve(self, parent_extent: Option<f64>, auto: f64) -> Result<f64> {
        match self {
            Dimension::Auto => Ok(auto),
            Dimension::Points(points) => Ok(points),
            Dimension::Fraction(fraction) => match parent_extent {
                // 0 * inf would be NaN
                Some(_) if fraction == 0.0 => Ok(0.0),
                Some(extent) => Ok(fraction * extent),
                None => Err(LayoutError::UnresolvedParentExtent { dimension: self }),
            },
        }
    }

    /// Whether this dimension has no opinion.
    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(self, Dimension::Auto)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Auto => f.write_str("auto"),
            Dimension::Points(points) => write!(f, "{points}pt"),
            Dimension::Fraction(fraction) => write!(f, "{}%", fraction * 100.0),
        }
    }
}

impl FromStr for Dimension {
    type Err = LayoutError;

    /// Parses `"auto"`, `"50%"`, `"12pt"` or a bare number of points.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = || LayoutError::InvalidDimension(s.to_string());

        if text.eq_ignore_ascii_case("auto") {
            return Ok(Dimension::Auto);
        }
        if let Some(percent) = text.strip_suffix('%') {
            let value: f64 = percent.trim().parse().map_err(|_| invalid())?;
            return Ok(Dimension::Fraction(value / 100.0));
        }
        let points = text.strip_suffix("pt").unwrap_or(text);
        let value: f64 = points.trim().parse().map_err(|_| invalid())?;
        if value.is_nan() {
            return Err(invalid());
        }
        Ok(Dimension::Points(value))
    }
}

/// Wire form of a dimension: either a bare number of points or a string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<DimensionRepr> for Dimension {
    type Error = LayoutError;

    fn try_from(repr: DimensionRepr) -> Result<Self> {
        match repr {
            DimensionRepr::Number(points) => Ok(Dimension::Points(points)),
            DimensionRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Dimension> for DimensionRepr {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Points(points) if points.is_finite() => DimensionRepr::Number(points),
            other => DimensionRepr::Text(other.to_string()),
        }
    }
}

/// The parent's extent on each axis, when it is already fixed.
///
/// `None` means the parent size depends on the content being measured, so
/// fractions cannot be resolved against that axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParentSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ParentSize {
    pub const UNDEFINED: Self = Self {
        width: None,
        height: None,
    };

    /// A fully known parent size.
    pub fn definite(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
        }
    }

    /// The finite maximum of `range` on each axis.
    pub fn from_max(range: &SizeRange) -> Self {
        Self {
            width: range.max.width.is_finite().then_some(range.max.width),
            height: range.max.height.is_finite().then_some(range.max.height),
        }
    }

    /// Only the axes where `range` is exact (min == max).
    pub fn from_exact(range: &SizeRange) -> Self {
        Self {
            width: (range.min.width == range.max.width && range.min.width.is_finite())
                .then_some(range.min.width),
            height: (range.min.height == range.max.height && range.min.height.is_finite())
                .then_some(range.min.height),
        }
    }

    /// Shrink each defined axis, flooring at zero.
    pub fn deflate(&self, horizontal: f64, vertical: f64) -> Self {
        Self {
            width: self.width.map(|w| (w - horizontal).max(0.0)),
            height: self.height.map(|h| (h - vertical).max(0.0)),
        }
    }
}

impl From<Size> for ParentSize {
    fn from(size: Size) -> Self {
        Self::definite(size)
    }
}

/// The size-related style of an element: exact, minimum and maximum
/// dimensions on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConstraints {
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub max_width: Dimension,
    pub max_height: Dimension,
}

impl SizeConstraints {
    /// Exact width and height.
    pub fn exact(width: Dimension, height: Dimension) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Whether every dimension is `Auto`.
    pub fn is_auto(&self) -> bool {
        *self == Self::default()
    }

    /// Resolve into a concrete range.
    ///
    /// Auto minimums default to `auto_range.min`, auto maximums to
    /// `auto_range.max`. If a resolved minimum exceeds its maximum the maximum
    /// wins. An exact dimension is clamped into the resolved min/max. The result
    /// is finally intersected with `auto_range`, which always wins.
    pub fn resolve(&self, parent: ParentSize, auto_range: SizeRange) -> Result<SizeRange> {
        let (min_width, max_width) = resolve_axis(
            self.min_width,
            self.width,
            self.max_width,
            parent.width,
            auto_range.min.width,
            auto_range.max.width,
        )?;
        let (min_height, max_height) = resolve_axis(
            self.min_height,
            self.height,
            self.max_height,
            parent.height,
            auto_range.min.height,
            auto_range.max.height,
        )?;

        let resolved = SizeRange::normalized(
            Size::new(min_width, min_height),
            Size::new(max_width, max_height),
        );
        Ok(auto_range.intersect(&resolved))
    }
}

fn resolve_axis(
    min: Dimension,
    exact: Dimension,
    max: Dimension,
    parent: Option<f64>,
    auto_min: f64,
    auto_max: f64,
) -> Result<(f64, f64)> {
    let upper = max.resolve(parent, auto_max)?.max(0.0);
    let lower = min.resolve(parent, auto_min)?.max(0.0).min(upper);

    if exact.is_auto() {
        return Ok((lower, upper));
    }
    let value = exact.resolve(parent, 0.0)?.max(lower).min(upper);
    Ok((value, value))
}
