//! The cell heap: two young semispaces plus a growable old generation.
//!
//! Every piece of process-wide mutable state the original C program keeps
//! as globals (`free_ptr`, `young_area_end`, the two young arrays, the old
//! chunk list, the free list, the stats counters) is instead a field of
//! one `Heap` value passed explicitly to the parser and evaluator.

use crate::cell::{Cell, CellRef, Link, Tag};
use crate::collect::CollectOutcome;
use crate::config::HeapConfig;
use crate::error::Result;
use crate::stats::GcStats;

/// Owns every cell the interpreter allocates.
pub struct Heap {
    pub(crate) config: HeapConfig,

    /// The two young semispaces. Exactly one is "active" (bump-allocated
    /// into) at a time; the other is either idle or, mid-collection, the
    /// destination of a copy.
    pub(crate) young: [Vec<Cell>; 2],
    pub(crate) active: u8,
    pub(crate) free_ptr: u32,

    /// The old generation: a flat, growable arena. Unlike the reference
    /// interpreter's linked list of fixed-size `HeapChunk`s, a single
    /// `Vec<Cell>` suffices because `CellRef::Old` indices stay valid
    /// across any reallocation `Vec::push` triggers — only raw addresses
    /// would be invalidated, and nothing here holds one.
    pub(crate) old: Vec<Cell>,
    pub(crate) old_free_list: Link,

    pub(crate) stats: GcStats,
}

impl Heap {
    /// Build a heap and seed the old generation with one chunk, matching
    /// the reference interpreter's `storage_init()`.
    pub fn new(config: HeapConfig) -> Result<Self> {
        config.validate()?;
        let young_size = config.young_size as usize;
        let mut heap = Self {
            config,
            young: [
                vec![Cell::empty(); young_size],
                vec![Cell::empty(); young_size],
            ],
            active: 0,
            free_ptr: 0,
            old: Vec::new(),
            old_free_list: None,
            stats: GcStats::new(),
        };
        heap.grow_old();
        Ok(heap)
    }

    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// Dereference a cell reference. Panics on an out-of-range index,
    /// which can only happen from a bug in this crate (callers never see
    /// raw indices).
    pub fn cell(&self, r: CellRef) -> &Cell {
        match r {
            CellRef::Young(buf, idx) => &self.young[buf as usize][idx as usize],
            CellRef::Old(idx) => &self.old[idx as usize],
        }
    }

    pub fn cell_mut(&mut self, r: CellRef) -> &mut Cell {
        match r {
            CellRef::Young(buf, idx) => &mut self.young[buf as usize][idx as usize],
            CellRef::Old(idx) => &mut self.old[idx as usize],
        }
    }

    pub fn tag(&self, r: CellRef) -> Tag {
        self.cell(r).tag
    }

    /// Number of free slots left in the active young semispace.
    pub fn young_remaining(&self) -> u32 {
        self.config.young_size - self.free_ptr
    }

    /// Ensure at least `margin` cells can be allocated in the active young
    /// semispace before the next allocation site, running a minor
    /// collection (and, if necessary, a nested major collection) if not.
    /// This is the GC safe-point check every allocation site must perform
    /// before it allocates; `roots` is the live-register set for that call
    /// site, handed in explicitly rather than discovered by scanning a
    /// stack.
    pub fn ensure_capacity(&mut self, margin: u32, roots: &mut [Link]) -> Result<CollectOutcome> {
        if self.free_ptr + margin >= self.config.young_size {
            self.minor_collect(roots)
        } else {
            Ok(CollectOutcome::default())
        }
    }

    /// Bump-allocate a cell in the active young semispace. Callers must
    /// have called [`Heap::ensure_capacity`] first; violating that is an
    /// internal bug, not a recoverable error, so this asserts rather than
    /// returning `Result`.
    pub fn alloc(&mut self, tag: Tag, l: Link, r: Link) -> CellRef {
        debug_assert!(
            self.free_ptr < self.config.young_size,
            "alloc called without a prior ensure_capacity"
        );
        let idx = self.free_ptr;
        self.free_ptr += 1;
        let buf = self.active;
        self.young[buf as usize][idx as usize] = Cell {
            tag,
            l,
            r,
            ch: 0,
            age: 0,
            mark: false,
        };
        CellRef::Young(buf, idx)
    }

    pub fn alloc_leaf(&mut self, tag: Tag) -> CellRef {
        self.alloc(tag, None, None)
    }

    pub fn alloc_unary(&mut self, tag: Tag, l: CellRef) -> CellRef {
        self.alloc(tag, Some(l), None)
    }

    pub fn alloc_binary(&mut self, tag: Tag, l: CellRef, r: CellRef) -> CellRef {
        self.alloc(tag, Some(l), Some(r))
    }

    pub fn alloc_char(&mut self, tag: Tag, ch: u8) -> CellRef {
        debug_assert!(
            self.free_ptr < self.config.young_size,
            "alloc called without a prior ensure_capacity"
        );
        let idx = self.free_ptr;
        self.free_ptr += 1;
        let buf = self.active;
        self.young[buf as usize][idx as usize] = Cell::char_cell(tag, ch);
        CellRef::Young(buf, idx)
    }

    /// Grow the old generation by one chunk of `heap_chunk_size` cells,
    /// threading them onto the free list. Matches the reference
    /// interpreter's `grow()`.
    pub(crate) fn grow_old(&mut self) {
        let chunk_size = self.config.heap_chunk_size as usize;
        let base = self.old.len() as u32;
        self.old
            .extend(std::iter::repeat(Cell::empty()).take(chunk_size));
        for i in 0..chunk_size as u32 {
            let idx = base + i;
            let next = if i + 1 < chunk_size as u32 {
                Some(CellRef::Old(idx + 1))
            } else {
                self.old_free_list
            };
            self.old[idx as usize].l = next;
        }
        self.old_free_list = Some(CellRef::Old(base));
    }

    pub(crate) fn pop_old_free(&mut self) -> Option<CellRef> {
        let head = self.old_free_list?;
        let CellRef::Old(idx) = head else {
            unreachable!("old_free_list only ever threads CellRef::Old links")
        };
        self.old_free_list = self.old[idx as usize].l;
        Some(head)
    }

    /// Allocate a cell directly in the old generation. Used by the parser,
    /// which does not maintain a root set compatible with a minor
    /// collection, so every parsed cell must be immortal from the moment
    /// it is created.
    pub fn alloc_old(&mut self, tag: Tag, l: Link, r: Link, ch: u8) -> CellRef {
        if self.old_free_list.is_none() {
            self.grow_old();
        }
        let cr = self
            .pop_old_free()
            .expect("grow_old always replenishes the free list");
        let age = self.config.age_max + 1;
        *self.cell_mut(cr) = Cell {
            tag,
            l,
            r,
            ch,
            age,
            mark: false,
        };
        cr
    }

    pub fn alloc_old_leaf(&mut self, tag: Tag) -> CellRef {
        self.alloc_old(tag, None, None, 0)
    }
}

impl std::fmt::Debug for Heap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heap")
            .field("active", &self.active)
            .field("free_ptr", &self.free_ptr)
            .field("young_size", &self.config.young_size)
            .field("old_len", &self.old.len())
            .field("stats", &self.stats)
            .finish()
    }
}
