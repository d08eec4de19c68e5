//! Error types for the evaluator.

use thiserror::Error;

/// Errors the abstract machine can raise while running a program.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Heap(#[from] unlambda_heap::HeapError),

    /// An internal invariant was violated — a continuation-frame tag or an
    /// operator tag that should be unreachable turned up at dispatch time.
    /// Always a bug in this crate, never a consequence of the program being
    /// evaluated.
    #[error("[BUG] {0}")]
    Bug(String),
}

impl EvalError {
    pub fn is_bug(&self) -> bool {
        matches!(self, EvalError::Bug(_)) || matches!(self, EvalError::Heap(e) if e.is_bug())
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
