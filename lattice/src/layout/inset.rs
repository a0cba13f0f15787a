//! Inset layout: padding around a single child.
//!
//! An infinite inset means "whatever space remains on this side", which pins
//! the child to the opposite edge (or centers it when both sides of an axis are
//! infinite).

use super::computed::Layout;
use super::context::LayoutContext;
use super::dimension::ParentSize;
use super::element::{ElementKind, LayoutElement};
use super::size_range::SizeRange;
use super::style::{Style, impl_styled};
use crate::error::Result;
use crate::primitives::{EdgeInsets, Point, Size};

#[derive(Debug, Clone)]
pub struct InsetLayoutSpec {
    insets: EdgeInsets,
    child: LayoutElement,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(InsetLayoutSpec);

impl InsetLayoutSpec {
    pub fn new(insets: EdgeInsets, child: impl Into<LayoutElement>) -> Self {
        Self {
            insets,
            child: child.into(),
            style: Style::default(),
            debug_name: None,
        }
    }

    pub fn insets(&self) -> EdgeInsets {
        self.insets
    }

    pub fn child(&self) -> &LayoutElement {
        &self.child
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        parent: ParentSize,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        let insets = self.insets;
        let insets_x = insets.horizontal();
        let insets_y = insets.vertical();

        // An infinite inset on an axis lets the child take its intrinsic size.
        let min_width = if insets.left.is_infinite() || insets.right.is_infinite() {
            0.0
        } else {
            range.min.width
        };
        let min_height = if insets.top.is_infinite() || insets.bottom.is_infinite() {
            0.0
        } else {
            range.min.height
        };

        let child_range = SizeRange::normalized(
            Size::new(min_width - insets_x, min_height - insets_y),
            Size::new(range.max.width - insets_x, range.max.height - insets_y),
        );
        let child = self.child.layout_that_fits(
            child_range,
            parent.deflate(insets_x, insets_y),
            ctx,
        )?;
        let child_size = child.size();

        let size = range.clamp(Size::new(
            outer_extent(child_size.width, insets.left, insets.right, range.max.width),
            outer_extent(child_size.height, insets.top, insets.bottom, range.max.height),
        ));

        let env = ctx.env();
        let x = leading_offset(insets.left, insets.right, size.width, child_size.width, |v| {
            env.round_pixel(v)
        });
        let y = leading_offset(insets.top, insets.bottom, size.height, child_size.height, |v| {
            env.round_pixel(v)
        });

        Ok(Layout::new(
            ElementKind::Inset,
            size,
            vec![child.positioned(Point::new(x, y))],
        ))
    }
}

/// Size along one axis: child plus insets, or everything available when an
/// inset is infinite.
fn outer_extent(child: f64, leading: f64, trailing: f64, max: f64) -> f64 {
    let finite_sum = child + finite_or(leading, 0.0) + finite_or(trailing, 0.0);
    if (leading.is_infinite() || trailing.is_infinite()) && max.is_finite() {
        max
    } else {
        finite_sum
    }
}

/// Child offset along one axis.
fn leading_offset(
    leading: f64,
    trailing: f64,
    outer: f64,
    child: f64,
    round: impl Fn(f64) -> f64,
) -> f64 {
    if leading.is_finite() {
        return leading;
    }
    let trailing = finite_or(trailing, round((outer - child) / 2.0));
    outer - (trailing + child)
}

#[inline]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::LeafElement;

    fn bounded(width: f64, height: f64) -> SizeRange {
        SizeRange::new(Size::ZERO, Size::new(width, height)).unwrap()
    }

    #[test]
    fn test_finite_insets_add_to_child() {
        let spec: LayoutElement =
            InsetLayoutSpec::new(EdgeInsets::new(5.0, 10.0, 15.0, 20.0), LeafElement::fixed(50.0, 40.0))
                .into();
        let layout = spec.measure(bounded(500.0, 500.0)).unwrap();
        assert_eq!(layout.size(), Size::new(80.0, 60.0));
        assert_eq!(layout.sublayouts()[0].position(), Some(Point::new(10.0, 5.0)));
    }

    #[test]
    fn test_infinite_left_pins_child_to_right() {
        let insets = EdgeInsets::new(0.0, f64::INFINITY, 0.0, 10.0);
        let spec: LayoutElement = InsetLayoutSpec::new(insets, LeafElement::fixed(50.0, 40.0)).into();
        let layout = spec.measure(bounded(300.0, 100.0)).unwrap();
        assert_eq!(layout.size(), Size::new(300.0, 40.0));
        assert_eq!(layout.sublayouts()[0].position(), Some(Point::new(240.0, 0.0)));
    }

    #[test]
    fn test_infinite_both_sides_centers() {
        let insets = EdgeInsets::new(0.0, f64::INFINITY, 0.0, f64::INFINITY);
        let spec: LayoutElement = InsetLayoutSpec::new(insets, LeafElement::fixed(50.0, 40.0)).into();
        let layout = spec.measure(bounded(300.0, 100.0)).unwrap();
        assert_eq!(layout.sublayouts()[0].position(), Some(Point::new(125.0, 0.0)));
    }

    #[test]
    fn test_infinite_inset_without_max_uses_child_size() {
        let insets = EdgeInsets::new(0.0, f64::INFINITY, 0.0, 10.0);
        let spec: LayoutElement = InsetLayoutSpec::new(insets, LeafElement::fixed(50.0, 40.0)).into();
        let layout = spec.measure(SizeRange::UNCONSTRAINED).unwrap();
        assert_eq!(layout.size(), Size::new(60.0, 40.0));
        assert_eq!(layout.sublayouts()[0].position(), Some(Point::new(0.0, 0.0)));
    }
}
