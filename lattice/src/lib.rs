//! Lattice - a constraint-based layout engine.
//!
//! Elements describe *how* to lay out content; measuring an element tree
//! within a [`SizeRange`] yields an immutable, positioned [`Layout`] tree.
//!
//! ```
//! use lattice::layout::{LayoutElement, LeafElement, SizeRange, StackLayoutSpec};
//! use lattice::primitives::Size;
//!
//! let row: LayoutElement = StackLayoutSpec::horizontal()
//!     .spacing(10.0)
//!     .child(LeafElement::fixed(50.0, 20.0))
//!     .child(LeafElement::fixed(100.0, 20.0))
//!     .into();
//!
//! let layout = row.measure(SizeRange::UNCONSTRAINED).unwrap();
//! assert_eq!(layout.size(), Size::new(160.0, 20.0));
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod primitives;
pub mod scene;

pub use config::RenderingEnvironment;
pub use error::{LayoutError, Result};
pub use layout::{Layout, LayoutElement, SizeRange};
