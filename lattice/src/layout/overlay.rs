//! Overlay and background layouts.
//!
//! Both measure a primary child with the incoming range, then lay a secondary
//! child over the primary's exact size. They differ only in paint order.

use super::computed::Layout;
use super::context::LayoutContext;
use super::dimension::ParentSize;
use super::element::{ElementKind, LayoutElement};
use super::size_range::SizeRange;
use super::style::{Style, impl_styled};
use crate::error::Result;
use crate::primitives::Point;

/// Primary layout plus a secondary layout sized to match it.
fn layout_pair(
    primary: &LayoutElement,
    secondary: &LayoutElement,
    range: SizeRange,
    parent: ParentSize,
    ctx: &LayoutContext<'_>,
) -> Result<(Layout, Layout)> {
    let primary = primary.layout_that_fits(range, parent, ctx)?;
    let size = primary.size();
    let secondary = secondary.layout_that_fits(SizeRange::exact(size), size.into(), ctx)?;
    Ok((
        primary.positioned(Point::ORIGIN),
        secondary.positioned(Point::ORIGIN),
    ))
}

/// Draws `overlay` in front of `child`, sized to match it.
#[derive(Debug, Clone)]
pub struct OverlayLayoutSpec {
    child: LayoutElement,
    overlay: LayoutElement,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(OverlayLayoutSpec);

impl OverlayLayoutSpec {
    pub fn new(child: impl Into<LayoutElement>, overlay: impl Into<LayoutElement>) -> Self {
        Self {
            child: child.into(),
            overlay: overlay.into(),
            style: Style::default(),
            debug_name: None,
        }
    }

    pub fn child(&self) -> &LayoutElement {
        &self.child
    }

    pub fn overlay(&self) -> &LayoutElement {
        &self.overlay
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        parent: ParentSize,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        let (content, overlay) = layout_pair(&self.child, &self.overlay, range, parent, ctx)?;
        Ok(Layout::new(ElementKind::Overlay, content.size(), vec![content, overlay]))
    }
}

/// Draws `background` behind `child`, sized to match it.
#[derive(Debug, Clone)]
pub struct BackgroundLayoutSpec {
    child: LayoutElement,
    background: LayoutElement,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(BackgroundLayoutSpec);

impl BackgroundLayoutSpec {
    pub fn new(child: impl Into<LayoutElement>, background: impl Into<LayoutElement>) -> Self {
        Self {
            child: child.into(),
            background: background.into(),
            style: Style::default(),
            debug_name: None,
        }
    }

    pub fn child(&self) -> &LayoutElement {
        &self.child
    }

    pub fn background(&self) -> &LayoutElement {
        &self.background
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        parent: ParentSize,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        let (content, background) =
            layout_pair(&self.child, &self.background, range, parent, ctx)?;
        Ok(Layout::new(
            ElementKind::Background,
            content.size(),
            vec![background, content],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::LeafElement;
    use crate::layout::style::Styled;
    use crate::primitives::Size;

    #[test]
    fn test_overlay_matches_child_size_and_paints_last() {
        let spec: LayoutElement =
            OverlayLayoutSpec::new(LeafElement::fixed(80.0, 30.0), LeafElement::fixed(10.0, 10.0))
                .into();
        let layout = spec.measure(SizeRange::UNCONSTRAINED).unwrap();
        assert_eq!(layout.size(), Size::new(80.0, 30.0));
        assert_eq!(layout.sublayouts()[1].size(), Size::new(80.0, 30.0));
        assert_eq!(layout.sublayouts()[1].position(), Some(Point::ORIGIN));
    }

    #[test]
    fn test_background_paints_first() {
        let spec: LayoutElement = BackgroundLayoutSpec::new(
            LeafElement::fixed(80.0, 30.0).debug_name("content"),
            LeafElement::fixed(500.0, 500.0).debug_name("fill"),
        )
        .into();
        let layout = spec.measure(SizeRange::UNCONSTRAINED).unwrap();
        assert_eq!(layout.size(), Size::new(80.0, 30.0));
        assert_eq!(layout.sublayouts()[0].size(), Size::new(80.0, 30.0));
        assert_eq!(layout.kind(), ElementKind::Background);
    }
}
