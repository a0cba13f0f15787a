//! Relative and center layouts.
//!
//! A relative spec places one child at the start, center or end of each axis.
//! Where the offered maximum is finite the layout fills it, unless asked to
//! shrink to the child on that axis.

use serde::{Deserialize, Serialize};

use super::computed::Layout;
use super::context::LayoutContext;
use super::dimension::ParentSize;
use super::element::{ElementKind, LayoutElement};
use super::size_range::SizeRange;
use super::style::{Style, impl_styled};
use crate::error::Result;
use crate::primitives::{Point, Size};

/// Placement of the child along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativePosition {
    /// No preference; behaves like `Start`.
    #[default]
    None,
    Start,
    Center,
    End,
}

impl RelativePosition {
    fn proportion(self) -> f64 {
        match self {
            RelativePosition::None | RelativePosition::Start => 0.0,
            RelativePosition::Center => 0.5,
            RelativePosition::End => 1.0,
        }
    }

    /// Whether the child may be smaller than the offered minimum on this axis.
    fn frees_child_minimum(self) -> bool {
        matches!(self, RelativePosition::Center | RelativePosition::End)
    }
}

/// Per-axis "shrink to the child" switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumSize {
    pub width: bool,
    pub height: bool,
}

impl MinimumSize {
    pub const NONE: Self = Self {
        width: false,
        height: false,
    };
    pub const BOTH: Self = Self {
        width: true,
        height: true,
    };
}

#[derive(Debug, Clone)]
pub struct RelativeLayoutSpec {
    horizontal: RelativePosition,
    vertical: RelativePosition,
    minimum_size: MinimumSize,
    child: LayoutElement,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(RelativeLayoutSpec);

impl RelativeLayoutSpec {
    pub fn new(
        horizontal: RelativePosition,
        vertical: RelativePosition,
        child: impl Into<LayoutElement>,
    ) -> Self {
        Self {
            horizontal,
            vertical,
            minimum_size: MinimumSize::NONE,
            child: child.into(),
            style: Style::default(),
            debug_name: None,
        }
    }

    pub fn minimum_size(mut self, minimum_size: MinimumSize) -> Self {
        self.minimum_size = minimum_size;
        self
    }

    pub fn child(&self) -> &LayoutElement {
        &self.child
    }

    pub fn positions(&self) -> (RelativePosition, RelativePosition) {
        (self.horizontal, self.vertical)
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        let parent = ParentSize::from_max(&range);

        let child_min = Size::new(
            if self.horizontal.frees_child_minimum() { 0.0 } else { range.min.width },
            if self.vertical.frees_child_minimum() { 0.0 } else { range.min.height },
        );
        let child = self.child.layout_that_fits(
            SizeRange::normalized(child_min, range.max),
            parent,
            ctx,
        )?;
        let child_size = child.size();

        // Unbounded axes take the child's size.
        let mut size = range.clamp(Size::new(
            parent.width.unwrap_or(child_size.width),
            parent.height.unwrap_or(child_size.height),
        ));
        if self.minimum_size.width {
            size.width = size.width.min(child_size.width);
        }
        if self.minimum_size.height {
            size.height = size.height.min(child_size.height);
        }
        let size = range.clamp(size);

        let env = ctx.env();
        let origin = Point::new(
            env.round_pixel((size.width - child_size.width) * self.horizontal.proportion()),
            env.round_pixel((size.height - child_size.height) * self.vertical.proportion()),
        );

        Ok(Layout::new(
            ElementKind::Relative,
            size,
            vec![child.positioned(origin)],
        ))
    }
}

/// Which axes a center spec centers on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Centering {
    None,
    X,
    Y,
    #[default]
    XY,
}

/// Centers a child in the available space.
#[derive(Debug, Clone)]
pub struct CenterLayoutSpec {
    inner: RelativeLayoutSpec,
    centering: Centering,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(CenterLayoutSpec);

impl CenterLayoutSpec {
    pub fn new(child: impl Into<LayoutElement>) -> Self {
        Self::with_options(Centering::XY, MinimumSize::NONE, child)
    }

    pub fn with_options(
        centering: Centering,
        minimum_size: MinimumSize,
        child: impl Into<LayoutElement>,
    ) -> Self {
        let on = |centered: bool| {
            if centered {
                RelativePosition::Center
            } else {
                RelativePosition::Start
            }
        };
        let horizontal = on(matches!(centering, Centering::X | Centering::XY));
        let vertical = on(matches!(centering, Centering::Y | Centering::XY));
        Self {
            inner: RelativeLayoutSpec::new(horizontal, vertical, child).minimum_size(minimum_size),
            centering,
            style: Style::default(),
            debug_name: None,
        }
    }

    pub fn centering(&self) -> Centering {
        self.centering
    }

    pub fn child(&self) -> &LayoutElement {
        self.inner.child()
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        Ok(self.inner.calculate_layout(range, ctx)?.with_kind(ElementKind::Center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::LeafElement;

    fn bounded(width: f64, height: f64) -> SizeRange {
        SizeRange::new(Size::ZERO, Size::new(width, height)).unwrap()
    }

    #[test]
    fn test_center_fills_and_centers() {
        let spec: LayoutElement = CenterLayoutSpec::new(LeafElement::fixed(20.0, 10.0)).into();
        let layout = spec.measure(bounded(100.0, 50.0)).unwrap();
        assert_eq!(layout.size(), Size::new(100.0, 50.0));
        assert_eq!(layout.sublayouts()[0].position(), Some(Point::new(40.0, 20.0)));
        assert_eq!(layout.kind(), ElementKind::Center);
    }

    #[test]
    fn test_center_unbounded_axis_hugs_child() {
        let spec: LayoutElement = CenterLayoutSpec::new(LeafElement::fixed(20.0, 10.0)).into();
        let range = SizeRange::new(Size::ZERO, Size::new(100.0, f64::INFINITY)).unwrap();
        let layout = spec.measure(range).unwrap();
        assert_eq!(layout.size(), Size::new(100.0, 10.0));
    }

    #[test]
    fn test_minimum_size_shrinks_to_child() {
        let spec: LayoutElement =
            CenterLayoutSpec::with_options(Centering::XY, MinimumSize::BOTH, LeafElement::fixed(20.0, 10.0))
                .into();
        let layout = spec.measure(bounded(100.0, 50.0)).unwrap();
        assert_eq!(layout.size(), Size::new(20.0, 10.0));
        assert_eq!(layout.sublayouts()[0].position(), Some(Point::ORIGIN));
    }

    #[test]
    fn test_relative_end_start() {
        let spec: LayoutElement = RelativeLayoutSpec::new(
            RelativePosition::End,
            RelativePosition::Start,
            LeafElement::fixed(20.0, 10.0),
        )
        .into();
        let layout = spec.measure(bounded(100.0, 50.0)).unwrap();
        assert_eq!(layout.sublayouts()[0].position(), Some(Point::new(80.0, 0.0)));
    }
}
