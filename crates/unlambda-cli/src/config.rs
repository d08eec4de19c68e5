//! The resolved run configuration: what `main` builds out of parsed flags
//! before it touches a heap, a parser, or the machine. Kept as a plain
//! struct so the flag-parsing code in `main.rs` and the execution code in
//! `run.rs` don't have to agree on anything beyond this one value.

use std::path::PathBuf;

/// Where the program text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
}

/// How much the run reports on stderr once it finishes.
///
/// `Silent` prints nothing. `Stats` adds the eval/gc timing block.
/// `PlusMajor` additionally logs every major collection as it happens;
/// `PlusMinor` logs minor collections too. Strictly increasing detail,
/// one level per `-v0`..`-v3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent,
    Stats,
    PlusMajor,
    PlusMinor,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Stats,
            2 => Verbosity::PlusMajor,
            _ => Verbosity::PlusMinor,
        }
    }

    pub fn prints_stats(self) -> bool {
        self >= Verbosity::Stats
    }

    /// The `tracing` filter directive this verbosity level corresponds to.
    /// Below `PlusMajor` no heap event is shown at all; `PlusMajor` shows
    /// major collections (logged at `info`), `PlusMinor` shows both (minor
    /// collections are logged at `debug`).
    pub fn tracing_filter(self) -> &'static str {
        match self {
            Verbosity::Silent | Verbosity::Stats => "unlambda_heap=warn",
            Verbosity::PlusMajor => "unlambda_heap=info",
            Verbosity::PlusMinor => "unlambda_heap=debug",
        }
    }
}

/// Fully resolved description of one interpreter run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: Source,
    pub verbosity: Verbosity,
    pub unbuffered: bool,
}
