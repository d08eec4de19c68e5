//! The CEK-style abstract machine that evaluates Unlambda expressions.
//!
//! This crate knows nothing about source text — it consumes the cell graph
//! `unlambda-parser` builds (plus the shared `i`/`v` atom refs, passed in
//! directly rather than via a dependency on that crate, to keep the crate
//! graph acyclic) and reduces it to normal form, performing whatever `.`,
//! `@`, and `|` side effects the program demands along the way.

pub mod error;
pub mod io;
pub mod machine;

pub use error::{EvalError, Result};
pub use io::{BufferIo, CharIo};
pub use machine::Machine;
