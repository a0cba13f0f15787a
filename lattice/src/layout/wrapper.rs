//! Wrapper layout: children stacked at the origin.

use super::computed::Layout;
use super::context::LayoutContext;
use super::dimension::ParentSize;
use super::element::{ElementKind, LayoutElement};
use super::size_range::SizeRange;
use super::style::{Style, impl_styled};
use crate::error::Result;
use crate::primitives::Point;

/// Measures every child against the same range and takes the largest size.
///
/// Useful for handing a single element to an API that expects a spec without
/// adding any positioning of its own.
#[derive(Debug, Clone, Default)]
pub struct WrapperLayoutSpec {
    children: Vec<LayoutElement>,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(WrapperLayoutSpec);

impl WrapperLayoutSpec {
    pub fn new(child: impl Into<LayoutElement>) -> Self {
        Self::default().child(child)
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
        let mut size = range.min;
        let mut sublayouts = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let layout = child.layout_that_fits(range, parent, ctx)?;
            size.width = size.width.max(layout.size().width);
            size.height = size.height.max(layout.size().height);
            sublayouts.push(layout.positioned(Point::ORIGIN));
        }
        Ok(Layout::new(ElementKind::Wrapper, size, sublayouts))
    }
}
