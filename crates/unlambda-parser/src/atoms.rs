//! The nine atomic combinators, allocated once per parse and shared by every
//! reference to them in the program (and, per the evaluator's `@`/`?`
//! handling, reused rather than re-allocated at run time too).

use unlambda_heap::{CellRef, Heap, Tag};

/// Shared singleton cells for the atomic combinators that carry no payload.
/// `d` (delay) is included because `D1` partial applications always wrap
/// the same shared `d`.
#[derive(Debug, Clone, Copy)]
pub struct Atoms {
    pub i: CellRef,
    pub k: CellRef,
    pub s: CellRef,
    pub v: CellRef,
    pub d: CellRef,
    pub c: CellRef,
    pub e: CellRef,
    pub at: CellRef,
    pub pipe: CellRef,
}

impl Atoms {
    /// Allocate all nine singletons directly in the old generation: they
    /// live for the entire run, so there is no point ever copying them.
    pub fn allocate(heap: &mut Heap) -> Self {
        Atoms {
            i: heap.alloc_old_leaf(Tag::I),
            k: heap.alloc_old_leaf(Tag::K),
            s: heap.alloc_old_leaf(Tag::S),
            v: heap.alloc_old_leaf(Tag::V),
            d: heap.alloc_old_leaf(Tag::D),
            c: heap.alloc_old_leaf(Tag::C),
            e: heap.alloc_old_leaf(Tag::E),
            at: heap.alloc_old_leaf(Tag::At),
            pipe: heap.alloc_old_leaf(Tag::Pipe),
        }
    }
}
