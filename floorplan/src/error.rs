//! Layout engine error types

use thiserror::Error;

use crate::model::ElementId;

/// Layout engine error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Chair capacity below 1 (missing or invalid input)
    #[error("invalid chair capacity {0}: must be at least 1")]
    InvalidCapacity(i32),

    /// Referenced price tier does not exist in the model
    #[error("unknown price tier: {0}")]
    UnknownPriceTier(i64),

    /// Referenced element does not exist in the model
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),

    /// Operation expected a table but got something else
    #[error("element {0} is not a table")]
    NotATable(ElementId),

    /// Generator invoked with a zero count
    #[error("generation count must be positive")]
    EmptyGeneration,
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
