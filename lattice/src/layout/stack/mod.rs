//! Stack layout: the flexbox solver.
//!
//! Children are laid out along a primary axis, optionally wrapped into
//! several lines, flexed to fit the stack's primary extent and aligned on the
//! cross axis.
//!
//! # Pipeline
//!
//! ```text
//! measure children -> wrap into lines -> flex each line
//!     -> line cross sizes + baselines -> stretch -> position
//! ```
//!
//! The first four stages live in [`unpositioned`], positioning in
//! [`positioned`]. Flexing is a single proportional pass: a child whose size
//! is non-monotonic in the space it is offered (reflowing text, say) may end
//! up slightly off its target after re-measurement.

mod positioned;
mod unpositioned;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::computed::Layout;
use super::context::LayoutContext;
use super::element::{ElementKind, LayoutElement};
use super::size_range::SizeRange;
use super::style::{Style, impl_styled};
use crate::error::Result;
use crate::primitives::{Point, Size};

use self::unpositioned::UnpositionedLayout;

/// Violations smaller than this are treated as zero.
pub(crate) const VIOLATION_EPSILON: f64 = 0.01;

// =========================================================================
// Options
// =========================================================================

/// The primary axis of a stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl StackDirection {
    /// Extent of `size` along the primary axis.
    #[inline]
    pub fn primary(self, size: Size) -> f64 {
        match self {
            StackDirection::Horizontal => size.width,
            StackDirection::Vertical => size.height,
        }
    }

    /// Extent of `size` along the cross axis.
    #[inline]
    pub fn cross(self, size: Size) -> f64 {
        match self {
            StackDirection::Horizontal => size.height,
            StackDirection::Vertical => size.width,
        }
    }

    /// Build a size from primary and cross extents.
    #[inline]
    pub fn size(self, primary: f64, cross: f64) -> Size {
        match self {
            StackDirection::Horizontal => Size::new(primary, cross),
            StackDirection::Vertical => Size::new(cross, primary),
        }
    }

    /// Build a point from primary and cross offsets.
    #[inline]
    pub fn point(self, primary: f64, cross: f64) -> Point {
        match self {
            StackDirection::Horizontal => Point::new(primary, cross),
            StackDirection::Vertical => Point::new(cross, primary),
        }
    }

    /// Build a range from primary and cross bounds. Max wins on inversion.
    #[inline]
    pub fn range(self, primary: (f64, f64), cross: (f64, f64)) -> SizeRange {
        SizeRange::normalized(self.size(primary.0, cross.0), self.size(primary.1, cross.1))
    }

    pub fn is_horizontal(self) -> bool {
        self == StackDirection::Horizontal
    }
}

/// Distribution of leftover primary-axis space within a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JustifyContent {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
}

/// Default cross-axis alignment of children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignItems {
    #[default]
    Start,
    End,
    Center,
    Stretch,
    BaselineFirst,
    BaselineLast,
}

impl AlignItems {
    pub fn is_baseline(self) -> bool {
        matches!(self, AlignItems::BaselineFirst | AlignItems::BaselineLast)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
}

/// Distribution of lines along the cross axis when wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignContent {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    /// Grow every line equally to fill the stack's minimum cross extent.
    Stretch,
}

/// Alignment along the x axis, mapped to justify or align-items depending on
/// the stack direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    Left,
    Middle,
    Right,
}

/// Alignment along the y axis, mapped to justify or align-items depending on
/// the stack direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
}

/// Everything about a stack except its children.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackOptions {
    pub direction: StackDirection,
    /// Gap between adjacent children in a line.
    pub spacing: f64,
    /// Gap between adjacent lines.
    pub line_spacing: f64,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub flex_wrap: FlexWrap,
    pub align_content: AlignContent,
    /// Measure children on the rayon pool.
    pub concurrent: bool,
}

// =========================================================================
// StackLayoutSpec
// =========================================================================

/// Lays out children along one axis with flexbox semantics.
#[derive(Debug, Clone, Default)]
pub struct StackLayoutSpec {
    options: StackOptions,
    children: Vec<LayoutElement>,
    pub(crate) style: Style,
    pub(crate) debug_name: Option<String>,
}

impl_styled!(StackLayoutSpec);

impl StackLayoutSpec {
    pub fn new(direction: StackDirection) -> Self {
        Self {
            options: StackOptions {
                direction,
                ..StackOptions::default()
            },
            ..Self::default()
        }
    }

    /// A left-to-right stack.
    pub fn horizontal() -> Self {
        Self::new(StackDirection::Horizontal)
    }

    /// A top-to-bottom stack.
    pub fn vertical() -> Self {
        Self::new(StackDirection::Vertical)
    }

    pub fn with_options(options: StackOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.options.spacing = spacing;
        self
    }

    pub fn line_spacing(mut self, spacing: f64) -> Self {
        self.options.line_spacing = spacing;
        self
    }

    pub fn justify_content(mut self, justify: JustifyContent) -> Self {
        self.options.justify_content = justify;
        self
    }

    pub fn align_items(mut self, align: AlignItems) -> Self {
        self.options.align_items = align;
        self
    }

    pub fn flex_wrap(mut self, wrap: FlexWrap) -> Self {
        self.options.flex_wrap = wrap;
        self
    }

    pub fn align_content(mut self, align: AlignContent) -> Self {
        self.options.align_content = align;
        self
    }

    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.options.concurrent = concurrent;
        self
    }

    /// Align children along x, whichever axis that is for this stack.
    pub fn horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        if self.options.direction.is_horizontal() {
            self.options.justify_content = match alignment {
                HorizontalAlignment::Left => JustifyContent::Start,
                HorizontalAlignment::Middle => JustifyContent::Center,
                HorizontalAlignment::Right => JustifyContent::End,
            };
        } else {
            self.options.align_items = match alignment {
                HorizontalAlignment::Left => AlignItems::Start,
                HorizontalAlignment::Middle => AlignItems::Center,
                HorizontalAlignment::Right => AlignItems::End,
            };
        }
        self
    }

    /// Align children along y, whichever axis that is for this stack.
    pub fn vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        if self.options.direction.is_horizontal() {
            self.options.align_items = match alignment {
                VerticalAlignment::Top => AlignItems::Start,
                VerticalAlignment::Center => AlignItems::Center,
                VerticalAlignment::Bottom => AlignItems::End,
            };
        } else {
            self.options.justify_content = match alignment {
                VerticalAlignment::Top => JustifyContent::Start,
                VerticalAlignment::Center => JustifyContent::Center,
                VerticalAlignment::Bottom => JustifyContent::End,
            };
        }
        self
    }

    /// Append a child.
    pub fn child(mut self, child: impl Into<LayoutElement>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children.
    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<LayoutElement>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn options(&self) -> &StackOptions {
        &self.options
    }

    pub fn direction(&self) -> StackDirection {
        self.options.direction
    }

    pub fn child_elements(&self) -> &[LayoutElement] {
        &self.children
    }

    pub(crate) fn calculate_layout(
        &self,
        range: SizeRange,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        if self.children.is_empty() {
            return Ok(Layout::new(ElementKind::Stack, range.clamp(Size::ZERO), Vec::new()));
        }

        let unpositioned = UnpositionedLayout::compute(self, range, ctx)?;
        let (size, sublayouts) = positioned::position(self, unpositioned, range, ctx);
        Ok(Layout::new(ElementKind::Stack, size, sublayouts))
    }
}

/// Map `f` over `items`, on the rayon pool when `concurrent` is set.
///
/// Results keep the order of `items` either way.
pub(crate) fn map_children<T, R, F>(concurrent: bool, items: &[T], f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync + Send,
{
    if concurrent && items.len() > 1 {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}
