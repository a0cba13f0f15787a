//! Range controller error types.

use lattice::LayoutError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("range controller must be created inside a tokio runtime")]
    NoRuntime,

    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("measurement worker panicked: {0}")]
    WorkerPanicked(String),
}

pub type Result<T> = std::result::Result<T, RangeError>;
