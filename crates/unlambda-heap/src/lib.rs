//! Generational cell heap and garbage collector for the Unlambda
//! interpreter.
//!
//! Every value the language ever manipulates — combinators, partial
//! applications, reified continuations, and the promise cells `d` produces
//! — is a [`cell::Cell`] living in this heap. Allocation happens in one of
//! two young semispaces; [`collect`] implements the copying minor
//! collection that reclaims them and the mark-sweep major collection that
//! reclaims the old generation cells they get promoted into.
//!
//! This crate has no notion of Unlambda syntax or evaluation order — it
//! only knows cells, tags, and reachability. `unlambda-parser` and
//! `unlambda-eval` are the crate's two clients.

pub mod cell;
pub mod collect;
pub mod config;
pub mod error;
pub mod heap;
pub mod stats;

pub use cell::{Cell, CellRef, Link, Tag};
pub use collect::CollectOutcome;
pub use config::HeapConfig;
pub use error::{HeapError, Result};
pub use heap::Heap;
pub use stats::GcStats;
