//! Error types for all `unlambda-heap` operations.

use thiserror::Error;

/// Errors the cell heap and collector can raise.
#[derive(Debug, Error)]
pub enum HeapError {
    #[error("heap configuration error: {0}")]
    Configuration(String),

    #[error("[BUG] {0}")]
    Bug(String),
}

impl HeapError {
    /// Whether this error represents an interpreter-internal invariant
    /// violation rather than a resource limit.
    pub fn is_bug(&self) -> bool {
        matches!(self, HeapError::Bug(_))
    }
}

/// Result type alias for `unlambda-heap` operations.
pub type Result<T> = std::result::Result<T, HeapError>;
