//! Top-level error type the binary exits on. Every lower-crate error
//! converts into this via `#[from]`, so `main` has exactly one `Result` to
//! match on when deciding the process exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot open source file {path}: {source}")]
    SourceFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] unlambda_parser::ParseError),

    #[error(transparent)]
    Eval(#[from] unlambda_eval::EvalError),

    #[error(transparent)]
    Heap(#[from] unlambda_heap::HeapError),
}

impl CliError {
    /// Whether stderr should carry the `[BUG]` prefix reserved for internal
    /// invariant violations, as opposed to ordinary fatal errors (bad
    /// flags, missing files, malformed programs).
    pub fn is_bug(&self) -> bool {
        match self {
            CliError::Eval(e) => e.is_bug(),
            CliError::Heap(e) => e.is_bug(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
