//! The collector: a Cheney-style copying minor collection over the two
//! young semispaces, and a mark-sweep major collection over the old
//! generation, grounded directly on the reference interpreter's
//! `minor_gc()`/`major_gc()`/`mark()`/`copy_cell()`.

use std::time::Instant;

use crate::cell::{Cell, CellRef, Link, Tag};
use crate::error::Result;
use crate::heap::Heap;

/// What a call to [`Heap::ensure_capacity`] actually did, surfaced so a
/// caller can log or report on a collection having run without the heap
/// needing its own logging policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectOutcome {
    pub minor_ran: bool,
    pub major_ran: bool,
}

impl Heap {
    /// Resolve a reference through a `Copied` forwarding record, if any.
    /// Old-generation cells are never tagged `Copied`, so this only ever
    /// chases young-space forwarding.
    fn effective(&self, r: CellRef) -> CellRef {
        let cell = self.cell(r);
        if cell.tag == Tag::Copied {
            cell.l.expect("Copied cell always carries a forwarding target")
        } else {
            r
        }
    }

    /// Relocate a single cell reachable from a root or an already-copied
    /// cell's child field. Implements the reference interpreter's
    /// `copy_cell()`, including the promotion-stub bookkeeping: when a cell
    /// is old enough to tenure, the to-space slot it *would* have occupied
    /// is not left empty — it is overwritten with a `Copied` stub pointing
    /// at the new old-generation cell. That stub is why the Cheney scan
    /// loop below still visits a promoted cell's as-yet-young children: the
    /// scan walks to-space sequentially by index, so without the stub
    /// occupying a slot, nothing would ever cause those children to be
    /// scanned and relocated. It substitutes for a write barrier.
    fn copy(
        &mut self,
        r: CellRef,
        to_buf: u8,
        free_ptr: &mut u32,
        roots: &mut [Link],
    ) -> Result<CellRef> {
        let CellRef::Young(from_buf, idx) = r else {
            // Already in the old generation: promotion is permanent, so an
            // old reference never needs relocating.
            return Ok(r);
        };

        let cell = self.young[from_buf as usize][idx as usize];
        if cell.tag == Tag::Copied {
            return Ok(cell.l.expect("Copied cell always carries a target"));
        }

        if cell.age >= self.config.age_max {
            if self.old_free_list.is_none() {
                self.major_collect(roots)?;
            }
            let new_old = self
                .pop_old_free()
                .expect("major_collect always replenishes the old free list");
            let mut payload = cell;
            payload.age = self.config.age_max + 1;
            payload.mark = false;
            *self.cell_mut(new_old) = payload;

            let stub_idx = *free_ptr;
            *free_ptr += 1;
            self.young[to_buf as usize][stub_idx as usize] = Cell {
                tag: Tag::Copied,
                l: Some(new_old),
                r: None,
                ch: 0,
                age: 0,
                mark: false,
            };

            self.young[from_buf as usize][idx as usize] = Cell {
                tag: Tag::Copied,
                l: Some(new_old),
                r: None,
                ch: 0,
                age: 0,
                mark: false,
            };
            Ok(new_old)
        } else {
            let new_idx = *free_ptr;
            *free_ptr += 1;
            let mut payload = cell;
            payload.age += 1;
            self.young[to_buf as usize][new_idx as usize] = payload;

            let forwarded = CellRef::Young(to_buf, new_idx);
            self.young[from_buf as usize][idx as usize] = Cell {
                tag: Tag::Copied,
                l: Some(forwarded),
                r: None,
                ch: 0,
                age: 0,
                mark: false,
            };
            Ok(forwarded)
        }
    }

    /// A minor collection: flip the active semispace, copy everything
    /// reachable from `roots` into it, then scan the copied cells
    /// sequentially (the Cheney "two-finger" technique — `free_ptr` is the
    /// allocation finger, `scan` the scavenge finger) until they catch up,
    /// relocating each child as it is discovered. Runs a nested major
    /// collection whenever the old free list runs dry while promoting.
    pub(crate) fn minor_collect(&mut self, roots: &mut [Link]) -> Result<CollectOutcome> {
        let start = Instant::now();
        let from_buf = self.active;
        let to_buf = 1 - self.active;
        self.active = to_buf;

        let mut free_ptr: u32 = 0;
        let mut major_ran = false;

        for i in 0..roots.len() {
            if self.old_free_list.is_none() {
                major_ran = true;
                self.major_collect(roots)?;
            }
            if let Some(r) = roots[i] {
                roots[i] = Some(self.copy(r, to_buf, &mut free_ptr, roots)?);
            }
        }

        let mut scan: u32 = 0;
        while scan < free_ptr {
            let cur = CellRef::Young(to_buf, scan);
            let eff = self.effective(cur);
            let tag = self.cell(eff).tag;

            if tag.is_unary() {
                if let Some(l) = self.cell(eff).l {
                    if self.old_free_list.is_none() {
                        major_ran = true;
                        self.major_collect(roots)?;
                    }
                    let nl = self.copy(l, to_buf, &mut free_ptr, roots)?;
                    self.cell_mut(eff).l = Some(nl);
                }
            } else if tag.is_binary() {
                if let Some(l) = self.cell(eff).l {
                    if self.old_free_list.is_none() {
                        major_ran = true;
                        self.major_collect(roots)?;
                    }
                    let nl = self.copy(l, to_buf, &mut free_ptr, roots)?;
                    self.cell_mut(eff).l = Some(nl);
                }
                if let Some(r) = self.cell(eff).r {
                    if self.old_free_list.is_none() {
                        major_ran = true;
                        self.major_collect(roots)?;
                    }
                    let nr = self.copy(r, to_buf, &mut free_ptr, roots)?;
                    self.cell_mut(eff).r = Some(nr);
                }
            }

            scan += 1;
        }

        self.free_ptr = free_ptr;
        let _ = from_buf; // from-space is simply abandoned; nothing to clean up eagerly.
        self.stats.record_minor(start.elapsed());

        tracing::debug!(
            survivors = free_ptr,
            young_size = self.config.young_size,
            "minor collection complete"
        );

        Ok(CollectOutcome {
            minor_ran: true,
            major_ran,
        })
    }

    /// Mark every old-generation cell reachable from `roots` (which may
    /// itself reference cells still in a young semispace mid-collection —
    /// marking those is harmless, since `mark` on young cells is cleared
    /// unconditionally below and never consulted otherwise). Mirrors the
    /// reference interpreter's explicit mark stack, which exists so deep
    /// continuation chains don't overflow the native call stack.
    fn mark(&mut self, roots: &[Link]) {
        let mut stack: Vec<CellRef> =
            Vec::with_capacity(self.config.initial_mark_stack_size.max(roots.len()));
        stack.extend(roots.iter().filter_map(|r| *r));

        while let Some(start) = stack.pop() {
            let mut cur = start;
            loop {
                let eff = self.effective(cur);
                if self.cell(eff).mark {
                    break;
                }
                self.cell_mut(eff).mark = true;
                let tag = self.cell(eff).tag;

                if tag.is_unary() {
                    match self.cell(eff).l {
                        Some(l) => {
                            cur = l;
                            continue;
                        }
                        None => break,
                    }
                } else if tag.is_binary() {
                    if let Some(r) = self.cell(eff).r {
                        stack.push(r);
                    }
                    match self.cell(eff).l {
                        Some(l) => {
                            cur = l;
                            continue;
                        }
                        None => break,
                    }
                } else {
                    break;
                }
            }
        }
    }

    /// A major collection: mark from `roots`, sweep the old generation back
    /// onto the free list, clear every mark bit (young and old alike — the
    /// reference interpreter clears both young arrays unconditionally
    /// regardless of which is active), and grow the old generation if the
    /// sweep reclaimed less than a fifth of it.
    pub(crate) fn major_collect(&mut self, roots: &mut [Link]) -> Result<()> {
        self.mark(roots);

        let mut freed: u32 = 0;
        let mut total = self.old.len() as u32;
        for i in 0..self.old.len() {
            if self.old[i].mark {
                self.old[i].mark = false;
            } else {
                self.old[i].l = self.old_free_list;
                self.old_free_list = Some(CellRef::Old(i as u32));
                freed += 1;
            }
        }

        for buf in 0..2usize {
            for cell in self.young[buf].iter_mut() {
                cell.mark = false;
            }
        }

        while freed < total / 5 {
            self.grow_old();
            freed += self.config.heap_chunk_size;
            total += self.config.heap_chunk_size;
        }

        self.stats.record_major();
        tracing::info!(freed, total, "major collection complete");
        Ok(())
    }
}
