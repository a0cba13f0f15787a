//! The layout element tree.
//!
//! [`LayoutElement`] is the switchboard every layout algorithm dispatches
//! through: a leaf wrapping measurable content, or one of the layout specs.
//! Elements are built with consuming builder methods and are immutable once
//! converted into a `LayoutElement`; the engine only ever reads them.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::absolute::AbsoluteLayoutSpec;
use super::computed::Layout;
use super::context::LayoutContext;
use super::dimension::ParentSize;
use super::inset::InsetLayoutSpec;
use super::overlay::{BackgroundLayoutSpec, OverlayLayoutSpec};
use super::ratio::RatioLayoutSpec;
use super::relative::{CenterLayoutSpec, RelativeLayoutSpec};
use super::size_range::SizeRange;
use super::stack::StackLayoutSpec;
use super::style::{Style, impl_styled};
use super::wrapper::WrapperLayoutSpec;
use crate::config::RenderingEnvironment;
use crate::error::Result;
use crate::primitives::Size;

// =========================================================================
// Leaf content
// =========================================================================

/// Content that knows its own size.
///
/// Implementations must be pure functions of `range`: the engine may call
/// `measure` several times per pass (once per flex pass and once per stretch)
/// and from several threads at once.
pub trait Measurable: Send + Sync {
    fn measure(&self, range: SizeRange) -> Size;

    /// Name shown in debug output.
    fn debug_name(&self) -> &str {
        "Leaf"
    }
}

impl<F> Measurable for F
where
    F: Fn(SizeRange) -> Size + Send + Sync,
{
    fn measure(&self, range: SizeRange) -> Size {
        self(range)
    }
}

/// Content with a fixed intrinsic size, clamped into whatever range it is
/// offered.
#[derive(Debug, Clone, PartialEq)]
pub struct IntrinsicContent {
    size: Size,
    name: Option<String>,
}

impl IntrinsicContent {
    pub fn new(size: Size) -> Self {
        Self { size, name: None }
    }

    pub fn named(size: Size, name: impl Into<String>) -> Self {
        Self {
            size,
            name: Some(name.into()),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

impl Measurable for IntrinsicContent {
    fn measure(&self, range: SizeRange) -> Size {
        range.clamp(self.size)
    }

    fn debug_name(&self) -> &str {
        self.name.as_deref().unwrap_or("IntrinsicContent")
    }
}

/// A leaf element: externally owned content plus its style.
#[derive(Clone)]
pub struct LeafElement {
    content: Arc<dyn Measurable>,
    style: Style,
    debug_name: Option<String>,
}

impl LeafElement {
    pub fn new(content: impl Measurable + 'static) -> Self {
        Self::from_shared(Arc::new(content))
    }

    /// Wrap content that is already shared with a presentation layer.
    pub fn from_shared(content: Arc<dyn Measurable>) -> Self {
        Self {
            content,
            style: Style::default(),
            debug_name: None,
        }
    }

    /// A leaf with a fixed intrinsic size.
    pub fn fixed(width: f64, height: f64) -> Self {
        Self::new(IntrinsicContent::new(Size::new(width, height)))
    }

    pub fn content(&self) -> &Arc<dyn Measurable> {
        &self.content
    }

    fn calculate_layout(&self, range: SizeRange) -> Layout {
        let size = range.clamp(self.content.measure(range));
        Layout::leaf(self.content.clone(), size)
    }
}

impl fmt::Debug for LeafElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafElement")
            .field("content", &self.content.debug_name())
            .field("style", &self.style)
            .field("debug_name", &self.debug_name)
            .finish()
    }
}

impl_styled!(LeafElement);

// =========================================================================
// Element kinds
// =========================================================================

/// What kind of element produced a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Leaf,
    Stack,
    Inset,
    Overlay,
    Background,
    Ratio,
    Absolute,
    Center,
    Relative,
    Wrapper,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Leaf => "Leaf",
            ElementKind::Stack => "StackLayoutSpec",
            ElementKind::Inset => "InsetLayoutSpec",
            ElementKind::Overlay => "OverlayLayoutSpec",
            ElementKind::Background => "BackgroundLayoutSpec",
            ElementKind::Ratio => "RatioLayoutSpec",
            ElementKind::Absolute => "AbsoluteLayoutSpec",
            ElementKind::Center => "CenterLayoutSpec",
            ElementKind::Relative => "RelativeLayoutSpec",
            ElementKind::Wrapper => "WrapperLayoutSpec",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =========================================================================
// LayoutElement
// =========================================================================

/// A node in the element tree.
#[derive(Debug, Clone)]
pub enum LayoutElement {
    Leaf(LeafElement),
    Stack(Box<StackLayoutSpec>),
    Inset(Box<InsetLayoutSpec>),
    Overlay(Box<OverlayLayoutSpec>),
    Background(Box<BackgroundLayoutSpec>),
    Ratio(Box<RatioLayoutSpec>),
    Absolute(Box<AbsoluteLayoutSpec>),
    Center(Box<CenterLayoutSpec>),
    Relative(Box<RelativeLayoutSpec>),
    Wrapper(Box<WrapperLayoutSpec>),
}

/// Runs `$body` with `$inner` bound to the element's payload.
macro_rules! dispatch {
    ($element:expr, $inner:ident => $body:expr) => {
        match $element {
            LayoutElement::Leaf($inner) => $body,
            LayoutElement::Stack($inner) => $body,
            LayoutElement::Inset($inner) => $body,
            LayoutElement::Overlay($inner) => $body,
            LayoutElement::Background($inner) => $body,
            LayoutElement::Ratio($inner) => $body,
            LayoutElement::Absolute($inner) => $body,
            LayoutElement::Center($inner) => $body,
            LayoutElement::Relative($inner) => $body,
            LayoutElement::Wrapper($inner) => $body,
        }
    };
}

impl LayoutElement {
    /// A leaf wrapping `content`.
    pub fn leaf(content: impl Measurable + 'static) -> Self {
        LayoutElement::Leaf(LeafElement::new(content))
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            LayoutElement::Leaf(_) => ElementKind::Leaf,
            LayoutElement::Stack(_) => ElementKind::Stack,
            LayoutElement::Inset(_) => ElementKind::Inset,
            LayoutElement::Overlay(_) => ElementKind::Overlay,
            LayoutElement::Background(_) => ElementKind::Background,
            LayoutElement::Ratio(_) => ElementKind::Ratio,
            LayoutElement::Absolute(_) => ElementKind::Absolute,
            LayoutElement::Center(_) => ElementKind::Center,
            LayoutElement::Relative(_) => ElementKind::Relative,
            LayoutElement::Wrapper(_) => ElementKind::Wrapper,
        }
    }

    /// Style attributes, read by whichever parent interprets them.
    pub fn style(&self) -> &Style {
        dispatch!(self, inner => &inner.style)
    }

    /// Explicit debug name, or a default derived from the element kind.
    pub fn debug_name(&self) -> Cow<'_, str> {
        let explicit = dispatch!(self, inner => inner.debug_name.as_deref());
        match (explicit, self) {
            (Some(name), _) => Cow::Borrowed(name),
            (None, LayoutElement::Leaf(leaf)) => Cow::Borrowed(leaf.content.debug_name()),
            (None, _) => Cow::Borrowed(self.kind().name()),
        }
    }

    /// Direct children, in layout order.
    pub fn children(&self) -> Vec<&LayoutElement> {
        match self {
            LayoutElement::Leaf(_) => Vec::new(),
            LayoutElement::Stack(spec) => spec.child_elements().iter().collect(),
            LayoutElement::Inset(spec) => vec![spec.child()],
            LayoutElement::Overlay(spec) => vec![spec.child(), spec.overlay()],
            LayoutElement::Background(spec) => vec![spec.background(), spec.child()],
            LayoutElement::Ratio(spec) => vec![spec.child()],
            LayoutElement::Absolute(spec) => spec.child_elements().iter().collect(),
            LayoutElement::Center(spec) => vec![spec.child()],
            LayoutElement::Relative(spec) => vec![spec.child()],
            LayoutElement::Wrapper(spec) => spec.child_elements().iter().collect(),
        }
    }

    /// Measure this tree within `range` using the default environment.
    pub fn measure(&self, range: SizeRange) -> Result<Layout> {
        self.measure_in(range, &RenderingEnvironment::default())
    }

    /// Measure this tree within `range`.
    ///
    /// The tree is validated first. Fractions on the root resolve against the
    /// finite maximum of `range`.
    pub fn measure_in(&self, range: SizeRange, env: &RenderingEnvironment) -> Result<Layout> {
        self.validate()?;
        let ctx = LayoutContext::new(env);
        self.layout_that_fits(range, ParentSize::from_max(&range), &ctx)
    }

    /// Check that no leaf content appears twice in this tree.
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_tree(self)
    }

    /// Nested ASCII boxes describing this tree.
    pub fn ascii_art(&self) -> String {
        super::ascii_art::render(self)
    }

    /// Lay this element out inside `range`.
    ///
    /// The element's own size constraints are resolved against `parent` and
    /// intersected with `range` (the ancestor wins), then the element's
    /// algorithm runs. The returned layout has no position; the caller
    /// places it.
    pub fn layout_that_fits(
        &self,
        range: SizeRange,
        parent: ParentSize,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout> {
        let own = self.style().size.resolve(parent, SizeRange::UNCONSTRAINED)?;
        let resolved = range.intersect(&own);

        tracing::trace!(
            depth = ctx.depth(),
            element = %self.debug_name(),
            range = %resolved,
            "calculating layout"
        );

        let child_ctx = ctx.child();
        let layout = match self {
            LayoutElement::Leaf(leaf) => leaf.calculate_layout(resolved),
            LayoutElement::Stack(spec) => spec.calculate_layout(resolved, &child_ctx)?,
            LayoutElement::Inset(spec) => spec.calculate_layout(resolved, parent, &child_ctx)?,
            LayoutElement::Overlay(spec) => spec.calculate_layout(resolved, parent, &child_ctx)?,
            LayoutElement::Background(spec) => spec.calculate_layout(resolved, parent, &child_ctx)?,
            LayoutElement::Ratio(spec) => spec.calculate_layout(resolved, parent, &child_ctx)?,
            LayoutElement::Absolute(spec) => spec.calculate_layout(resolved, &child_ctx)?,
            LayoutElement::Center(spec) => spec.calculate_layout(resolved, &child_ctx)?,
            LayoutElement::Relative(spec) => spec.calculate_layout(resolved, &child_ctx)?,
            LayoutElement::Wrapper(spec) => spec.calculate_layout(resolved, &child_ctx)?,
        };

        debug_assert!(
            layout.contains_in(&resolved),
            "{} produced {} outside {}",
            self.debug_name(),
            layout.size(),
            resolved
        );
        Ok(layout)
    }
}

macro_rules! impl_into_element {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for LayoutElement {
                fn from(spec: $ty) -> Self {
                    LayoutElement::$variant(Box::new(spec))
                }
            }
        )+
    };
}

impl_into_element!(
    Stack => StackLayoutSpec,
    Inset => InsetLayoutSpec,
    Overlay => OverlayLayoutSpec,
    Background => BackgroundLayoutSpec,
    Ratio => RatioLayoutSpec,
    Absolute => AbsoluteLayoutSpec,
    Center => CenterLayoutSpec,
    Relative => RelativeLayoutSpec,
    Wrapper => WrapperLayoutSpec,
);

impl From<LeafElement> for LayoutElement {
    fn from(leaf: LeafElement) -> Self {
        LayoutElement::Leaf(leaf)
    }
}
