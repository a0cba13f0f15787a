//! Per-element style attributes.
//!
//! Every element carries a [`Style`]. Most fields are only read by a specific
//! kind of parent: flex and baseline fields by a stack, `layout_position` by an
//! absolute spec. An element placed elsewhere simply ignores them.
//!
//! Styles are set through the [`Styled`] builder methods before an element is
//! converted into a [`LayoutElement`](super::LayoutElement); afterwards they
//! are read-only.

use serde::{Deserialize, Serialize};

use super::dimension::{Dimension, SizeConstraints};
use crate::primitives::{EdgeInsets, Point};

/// Cross-axis alignment override for a single stack child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignSelf {
    /// Inherit the stack's `align_items`.
    #[default]
    Auto,
    Start,
    End,
    Center,
    Stretch,
    BaselineFirst,
    BaselineLast,
}

/// Number of slots of each kind in [`StyleExtensions`].
pub const EXTENSION_BOOL_SLOTS: usize = 4;
pub const EXTENSION_INTEGER_SLOTS: usize = 4;
pub const EXTENSION_INSETS_SLOTS: usize = 1;

/// Fixed extension slots for attributes a custom spec wants to read from its
/// children. The engine itself never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleExtensions {
    pub bools: [bool; EXTENSION_BOOL_SLOTS],
    pub integers: [i64; EXTENSION_INTEGER_SLOTS],
    pub edge_insets: [EdgeInsets; EXTENSION_INSETS_SLOTS],
}

/// Layout attributes of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Exact, minimum and maximum size.
    pub size: SizeConstraints,
    /// Extra space before this child along a stack's primary axis.
    pub spacing_before: f64,
    /// Extra space after this child along a stack's primary axis.
    pub spacing_after: f64,
    /// Share of positive free space this child absorbs.
    pub flex_grow: f64,
    /// Weight (times basis) of overflow this child absorbs.
    pub flex_shrink: f64,
    /// Initial primary-axis size. `Auto` uses the measured natural size.
    pub flex_basis: Dimension,
    pub align_self: AlignSelf,
    /// Distance from the top edge to the first baseline.
    pub ascender: f64,
    /// Distance from the last baseline to the bottom edge.
    pub descender: f64,
    /// Origin inside an absolute spec.
    pub layout_position: Point,
    pub extensions: StyleExtensions,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            size: SizeConstraints::default(),
            spacing_before: 0.0,
            spacing_after: 0.0,
            flex_grow: 0.0,
            flex_shrink: 0.0,
            flex_basis: Dimension::Auto,
            align_self: AlignSelf::Auto,
            ascender: 0.0,
            descender: 0.0,
            layout_position: Point::ORIGIN,
            extensions: StyleExtensions::default(),
        }
    }
}

/// Builder methods shared by every element type.
///
/// Implementors only provide access to their style and debug name; all the
/// chained setters come for free.
pub trait Styled: Sized {
    fn style_mut(&mut self) -> &mut Style;
    fn debug_name_mut(&mut self) -> &mut Option<String>;

    /// Replace the whole style.
    fn style(mut self, style: Style) -> Self {
        *self.style_mut() = style;
        self
    }

    /// Human-readable name used by debug output.
    fn debug_name(mut self, name: impl Into<String>) -> Self {
        *self.debug_name_mut() = Some(name.into());
        self
    }

    fn width(mut self, width: Dimension) -> Self {
        self.style_mut().size.width = width;
        self
    }

    fn height(mut self, height: Dimension) -> Self {
        self.style_mut().size.height = height;
        self
    }

    fn min_width(mut self, width: Dimension) -> Self {
        self.style_mut().size.min_width = width;
        self
    }

    fn min_height(mut self, height: Dimension) -> Self {
        self.style_mut().size.min_height = height;
        self
    }

    fn max_width(mut self, width: Dimension) -> Self {
        self.style_mut().size.max_width = width;
        self
    }

    fn max_height(mut self, height: Dimension) -> Self {
        self.style_mut().size.max_height = height;
        self
    }

    fn flex_grow(mut self, grow: f64) -> Self {
        self.style_mut().flex_grow = grow;
        self
    }

    fn flex_shrink(mut self, shrink: f64) -> Self {
        self.style_mut().flex_shrink = shrink;
        self
    }

    fn flex_basis(mut self, basis: Dimension) -> Self {
        self.style_mut().flex_basis = basis;
        self
    }

    fn align_self(mut self, align: AlignSelf) -> Self {
        self.style_mut().align_self = align;
        self
    }

    fn spacing_before(mut self, spacing: f64) -> Self {
        self.style_mut().spacing_before = spacing;
        self
    }

    fn spacing_after(mut self, spacing: f64) -> Self {
        self.style_mut().spacing_after = spacing;
        self
    }

    /// Baseline metrics, usually copied from a font.
    fn baseline_metrics(mut self, ascender: f64, descender: f64) -> Self {
        let style = self.style_mut();
        style.ascender = ascender;
        style.descender = descender;
        self
    }

    fn layout_position(mut self, position: Point) -> Self {
        self.style_mut().layout_position = position;
        self
    }

    fn extensions(mut self, extensions: StyleExtensions) -> Self {
        self.style_mut().extensions = extensions;
        self
    }
}

/// Implements [`Styled`] for types with `style` and `debug_name` fields.
macro_rules! impl_styled {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::layout::style::Styled for $ty {
                fn style_mut(&mut self) -> &mut $crate::layout::style::Style {
                    &mut self.style
                }

                fn debug_name_mut(&mut self) -> &mut Option<String> {
                    &mut self.debug_name
                }
            }
        )+
    };
}

pub(crate) use impl_styled;
