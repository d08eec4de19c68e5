//! Error types for reading Unlambda source.

use thiserror::Error;

/// Errors the reader can raise while turning source text into a cell graph.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected end of input at line {line}, column {column}")]
    UnexpectedEof { line: u32, column: u32 },

    #[error("unexpected character {ch:?} at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: u32, column: u32 },

    #[error("empty program")]
    EmptyProgram,

    #[error("I/O error reading source: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Heap(#[from] unlambda_heap::HeapError),
}

pub type Result<T> = std::result::Result<T, ParseError>;
