//! Configuration — heap sizing parameters.
//!
//! A plain data struct with a sensible `Default` and a `validate()` that
//! rejects combinations the collector cannot run with.

use crate::error::{HeapError, Result};

/// Tuning parameters for the cell heap.
///
/// # Examples
///
/// ```
/// use unlambda_heap::config::HeapConfig;
///
/// let config = HeapConfig::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// Number of cells in each young semispace.
    ///
    /// Default: 256 * 1024, matching the reference interpreter's
    /// `YOUNG_SIZE`.
    pub young_size: u32,

    /// Number of cells added to the old generation each time it grows.
    ///
    /// Default: 256 * 1024 - 1, matching `HEAP_CHUNK_SIZE`.
    pub heap_chunk_size: u32,

    /// Age at which a young cell is promoted to the old generation on its
    /// next minor collection, rather than copied within young space.
    ///
    /// Default: 2, matching `AGE_MAX`.
    pub age_max: u8,

    /// Initial capacity of the major-collection mark stack. The stack
    /// grows on demand (continuation chains routinely exceed any fixed
    /// size), so this only avoids early reallocations.
    ///
    /// Default: 64 * 1024, matching `INITIAL_MARK_STACK_SIZE`.
    pub initial_mark_stack_size: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            young_size: 256 * 1024,
            heap_chunk_size: 256 * 1024 - 1,
            age_max: 2,
            initial_mark_stack_size: 64 * 1024,
        }
    }
}

impl HeapConfig {
    /// A configuration tuned down for fast unit tests: small generations,
    /// low tenure threshold, so tests can force a promotion or a major
    /// collection without allocating hundreds of thousands of cells.
    pub fn small_for_tests() -> Self {
        Self {
            young_size: 64,
            heap_chunk_size: 32,
            age_max: 2,
            initial_mark_stack_size: 64,
        }
    }

    /// Reject configurations the collector cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.young_size == 0 {
            return Err(HeapError::Configuration(
                "young_size must be non-zero".into(),
            ));
        }
        if self.heap_chunk_size == 0 {
            return Err(HeapError::Configuration(
                "heap_chunk_size must be non-zero".into(),
            ));
        }
        if self.age_max == 0 {
            // age_max == 0 would promote every cell on its very first
            // minor collection before copy() ever had a chance to run —
            // not unsafe, just not a generational collector anymore.
            return Err(HeapError::Configuration(
                "age_max must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
