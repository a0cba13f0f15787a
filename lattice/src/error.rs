//! Layout error types.

use thiserror::Error;

use crate::layout::Dimension;
use crate::primitives::Size;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("fraction dimension {dimension} resolved without a defined parent extent")]
    UnresolvedParentExtent { dimension: Dimension },

    #[error("invalid size range: min {min} is not within max {max}")]
    InvalidSizeRange { min: Size, max: Size },

    #[error("element `{name}` appears more than once in the layout tree")]
    DuplicateElementInTree { name: String },

    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
