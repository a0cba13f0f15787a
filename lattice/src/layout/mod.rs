//! Layout engine for Lattice.
//!
//! Size negotiation is top-down and single pass:
//!
//! ```text
//! SizeRange flows down -> each element picks a Size within it -> parents position children
//! ```
//!
//! An element resolves its own [`SizeConstraints`] against the parent's size,
//! intersects them with the range its parent offered (the parent wins on
//! conflict) and runs its algorithm. The result is an immutable [`Layout`]
//! tree. Measurement reads no global state, so any element tree may be
//! measured from any thread.

pub mod dimension;
pub mod size_range;
pub mod style;

pub mod absolute;
mod ascii_art;
pub mod computed;
pub mod context;
pub mod element;
pub mod inset;
pub mod overlay;
pub mod ratio;
pub mod relative;
pub mod stack;
mod validation;
pub mod wrapper;

pub use absolute::{AbsoluteLayoutSpec, AbsoluteSizing};
pub use computed::Layout;
pub use context::LayoutContext;
pub use dimension::{Dimension, ParentSize, SizeConstraints};
pub use element::{ElementKind, IntrinsicContent, LayoutElement, LeafElement, Measurable};
pub use inset::InsetLayoutSpec;
pub use overlay::{BackgroundLayoutSpec, OverlayLayoutSpec};
pub use ratio::RatioLayoutSpec;
pub use relative::{CenterLayoutSpec, Centering, MinimumSize, RelativeLayoutSpec, RelativePosition};
pub use size_range::SizeRange;
pub use stack::{
    AlignContent, AlignItems, FlexWrap, HorizontalAlignment, JustifyContent, StackDirection,
    StackLayoutSpec, StackOptions, VerticalAlignment,
};
pub use style::{AlignSelf, Style, StyleExtensions, Styled};
pub use wrapper::WrapperLayoutSpec;
