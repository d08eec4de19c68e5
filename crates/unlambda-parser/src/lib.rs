//! Reader for Unlambda source.
//!
//! Unlambda's grammar is a single binary production — `` `xy `` applies `x`
//! to `y` — plus a fixed vocabulary of atoms, so this crate has no lexer
//! stage separate from parsing: [`parser::parse`] walks the byte stream
//! once, allocating cells directly into [`unlambda_heap::Heap`]'s old
//! generation as it goes.

pub mod atoms;
pub mod cursor;
pub mod error;
pub mod parser;

pub use atoms::Atoms;
pub use error::{ParseError, Result};
pub use parser::parse;
