//! Aspect-ratio layout.

use super::computed::Layout;
use super::context::LayoutContext;
use super::dimension::ParentSize;
use super::element::{ElementKind, LayoutElement};
use super::size_range::SizeRange;
use super::style::{Style, impl_styled};
use crate::error::Result;
use crate::primitives::{Point, Size};

/// Sizes its child so that `height == ratio * width`.
#[derive(Debug, Clone)]
pub struct RatioLayoutSpec {
    ratio: f64,
    child: LayoutElement,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(RatioLayoutSpec);

impl RatioLayoutSpec {
    /// `ratio` is height divided by width and should be positive.
    pub fn new(ratio: f64, child: impl Into<LayoutElement>) -> Self {
        Self {
            ratio,
            child: child.into(),
            style: Style::default(),
            debug_name: None,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn child(&self) -> &LayoutElement {
        &self.child
    }

    /// Largest size within `range.max` with the exact ratio, if one exists.
    ///
    /// Falls back to clamping when the ratio cannot meet the minimums.
    fn best_size(&self, range: &SizeRange) -> Option<Size> {
        let width = range.max.width.min(range.max.height / self.ratio);
        if !width.is_finite() {
            return None;
        }
        let candidate = Size::new(width, self.ratio * width);
        if range.min.fits_within(candidate) {
            Some(candidate)
        } else {
            Some(range.clamp(candidate))
        }
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        parent: ParentSize,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        let valid = self.ratio.is_finite() && self.ratio > 0.0;
        if !valid {
            tracing::warn!(ratio = self.ratio, "ignoring non-positive aspect ratio");
        }
        let best = if valid { self.best_size(&range) } else { None };

        let (child_range, child_parent) = match best {
            Some(size) => (range.intersect(&SizeRange::exact(size)), ParentSize::definite(size)),
            None => (range, parent),
        };
        let child = self.child.layout_that_fits(child_range, child_parent, ctx)?;
        Ok(Layout::new(
            ElementKind::Ratio,
            child.size(),
            vec![child.positioned(Point::ORIGIN)],
        ))
    }
}
