//! Absolute layout: children at explicit positions.
//!
//! Each child is placed at its style's `layout_position` and sized by its own
//! size constraints, resolved against the offered finite maximum. By default
//! it sizes itself to the union of its children's frames.

use serde::{Deserialize, Serialize};

use super::computed::Layout;
use super::context::LayoutContext;
use super::dimension::ParentSize;
use super::element::{ElementKind, LayoutElement};
use super::size_range::SizeRange;
use super::style::{Style, impl_styled};
use crate::error::Result;
use crate::primitives::Size;

/// How an absolute spec picks its own size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsoluteSizing {
    /// Just large enough for every child frame.
    #[default]
    SizeToFit,
    /// The maximum offered size, on axes where it is finite.
    Fill,
}

#[derive(Debug, Clone, Default)]
pub struct AbsoluteLayoutSpec {
    sizing: AbsoluteSizing,
    children: Vec<LayoutElement>,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(AbsoluteLayoutSpec);

impl AbsoluteLayoutSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sizing(mut self, sizing: AbsoluteSizing) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn child(mut self, child: impl Into<LayoutElement>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<LayoutElement>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn child_elements(&self) -> &[LayoutElement] {
        &self.children
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        let parent = ParentSize::from_max(&range);

        let sublayouts = self
            .children
            .iter()
            .map(|child| {
                let position = child.style().layout_position;
                let auto_range = SizeRange::normalized(
                    Size::ZERO,
                    Size::new(range.max.width - position.x, range.max.height - position.y),
                );
                let child_range = child.style().size.resolve(parent, auto_range)?;
                Ok(child.layout_that_fits(child_range, parent, ctx)?.positioned(position))
            })
            .collect::<Result<Vec<_>>>()?;

        let fit = |fill: Option<f64>, min: f64, extent: fn(&Layout) -> f64| match (self.sizing, fill) {
            (AbsoluteSizing::Fill, Some(max)) => max,
            _ => sublayouts.iter().map(extent).fold(min, f64::max),
        };
        let size = Size::new(
            fit(parent.width, range.min.width, |l: &Layout| l.frame().right()),
            fit(parent.height, range.min.height, |l: &Layout| l.frame().bottom()),
        );

        Ok(Layout::new(ElementKind::Absolute, range.clamp(size), sublayouts))
    }
}
