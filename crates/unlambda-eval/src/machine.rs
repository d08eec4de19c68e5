//! The abstract machine: a CEK-style evaluator over the cell heap.
//!
//! Grounded directly on the reference interpreter's `run()`, which is
//! written as a `switch`/`goto` loop over three regions — unwind the
//! current application spine (`eval:`), dispatch on the saved
//! continuation's task (the outer `switch (task)`), and apply an operator
//! to a value (`apply:`). Rust has no `goto`, so [`Region`] makes that
//! three-way control transfer an explicit state machine instead: each
//! step computes the next region rather than jumping to a label, the way
//! this codebase's other hand-written state machines are built.
//!
//! Every allocation site is guarded by a GC safe-point
//! ([`unlambda_heap::Heap::ensure_capacity`]) passing exactly the live
//! registers at that point as roots, mirroring the explicit `roots[]`
//! arrays the reference interpreter builds before calling `gc_run`.

use unlambda_heap::{CellRef, Heap, Link, Tag};

use crate::error::{EvalError, Result};
use crate::io::CharIo;

/// Which of the three control regions the machine is about to run.
/// `Apply` carries the operator cell `op` computed by whichever step
/// transitioned into it — there is no other way to reach `apply:` without
/// already knowing what to apply.
enum Region {
    Eval,
    Dispatch,
    Apply(CellRef),
}

/// The running machine: owns nothing but a heap reference and character
/// I/O, plus the atom refs it needs to answer `@`/`?`/`|` without
/// allocating a fresh cell for every byte read.
pub struct Machine<'h, Io> {
    heap: &'h mut Heap,
    io: Io,
    current_ch: Option<u8>,
    i_ref: CellRef,
    v_ref: CellRef,
}

impl<'h, Io: CharIo> Machine<'h, Io> {
    pub fn new(heap: &'h mut Heap, io: Io, i_ref: CellRef, v_ref: CellRef) -> Self {
        Machine {
            heap,
            io,
            current_ch: None,
            i_ref,
            v_ref,
        }
    }

    pub fn into_io(self) -> Io {
        self.io
    }

    pub fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    /// Push a new continuation frame. Matches `PUSHCONT(t, v)`: the cell
    /// created captures the *current* task/task_val as the suspended
    /// frame (tagged with the current task, not the new one), chained to
    /// whatever `next_cont` already pointed at; only then does `task`
    /// advance to `t` and `task_val` to `v`. No capacity check here — the
    /// caller's safe-point at the top of the current region already
    /// accounted for this allocation.
    fn push_cont(
        &mut self,
        task: &mut Tag,
        task_val: &mut Link,
        next_cont: &mut Link,
        new_task: Tag,
        new_task_val: Link,
    ) {
        let frame = self.heap.alloc(*task, *next_cont, *task_val);
        *next_cont = Some(frame);
        *task = new_task;
        *task_val = new_task_val;
    }

    /// Pop the most recently pushed continuation frame. Matches `POPCONT`.
    fn pop_cont(&mut self, task: &mut Tag, task_val: &mut Link, next_cont: &mut Link) -> Result<()> {
        let frame = next_cont.ok_or_else(|| {
            EvalError::Bug("POPCONT with an empty continuation chain".to_string())
        })?;
        let cell = *self.heap.cell(frame);
        *task = cell.tag;
        *task_val = cell.r;
        *next_cont = cell.l;
        Ok(())
    }

    /// Run the machine to completion starting from `root`. Returns once
    /// the task dispatch reaches the implicit bottom-of-chain `Exit`
    /// frame (mirrors `case EXIT: return;`), or once `` `e` `` runs (which
    /// sets `task = Exit` directly without waiting for the chain to
    /// unwind there).
    pub fn run(&mut self, root: CellRef) -> Result<()> {
        tracing::trace!("evaluation started");
        let mut val = root;
        let mut next_cont: Link = None;
        let mut task: Tag = Tag::Exit;
        let mut task_val: Link = None;
        let mut region = Region::Eval;

        loop {
            region = match region {
                Region::Eval => self.step_eval(&mut val, &mut task, &mut task_val, &mut next_cont)?,
                Region::Dispatch => {
                    match self.step_dispatch(&mut val, &mut task, &mut task_val, &mut next_cont)? {
                        Some(next) => next,
                        None => {
                            tracing::trace!("evaluation finished");
                            return Ok(());
                        }
                    }
                }
                Region::Apply(op) => {
                    self.step_apply(op, &mut val, &mut task, &mut task_val, &mut next_cont)?
                }
            };
        }
    }

    /// `eval:` — unwind the application spine `` `xy `` by pushing an
    /// `EVAL_RIGHT` frame for each operand and descending into the
    /// operator, until `val` is no longer an application node.
    fn step_eval(
        &mut self,
        val: &mut CellRef,
        task: &mut Tag,
        task_val: &mut Link,
        next_cont: &mut Link,
    ) -> Result<Region> {
        while self.heap.tag(*val) == Tag::Ap {
            let mut roots = [Some(*val), *task_val, *next_cont];
            self.heap.ensure_capacity(0, &mut roots)?;
            *val = roots[0].expect("val root never cleared");
            *task_val = roots[1];
            *next_cont = roots[2];

            let operand = self
                .heap
                .cell(*val)
                .r
                .expect("Ap cell always carries a right child");
            self.push_cont(task, task_val, next_cont, Tag::EvalRight, Some(operand));
            *val = self
                .heap
                .cell(*val)
                .l
                .expect("Ap cell always carries a left child");
        }
        Ok(Region::Dispatch)
    }

    /// The outer `switch (task)`: resume whatever continuation frame is
    /// current. Returns `Ok(None)` exactly when the implicit `Exit`
    /// sentinel frame is reached, ending the run.
    fn step_dispatch(
        &mut self,
        val: &mut CellRef,
        task: &mut Tag,
        task_val: &mut Link,
        next_cont: &mut Link,
    ) -> Result<Option<Region>> {
        match *task {
            Tag::EvalRight => {
                if self.heap.tag(*val) == Tag::D {
                    let op = *val;
                    *val = task_val.expect("EVAL_RIGHT always carries a task_val");
                    self.pop_cont(task, task_val, next_cont)?;
                    Ok(Some(Region::Apply(op)))
                } else {
                    let rand = task_val.expect("EVAL_RIGHT always carries a task_val");
                    *task = Tag::Apply;
                    *task_val = Some(*val);
                    *val = rand;
                    Ok(Some(Region::Eval))
                }
            }
            Tag::EvalRightS => {
                let op;
                if self.heap.tag(*val) == Tag::D {
                    op = *val;
                    *val = task_val.expect("EVAL_RIGHT_S always carries a task_val");
                    self.pop_cont(task, task_val, next_cont)?;
                } else {
                    let rand = task_val.expect("EVAL_RIGHT_S always carries a task_val");
                    *task = Tag::Apply;
                    *task_val = Some(*val);
                    let rand_cell = *self.heap.cell(rand);
                    op = rand_cell
                        .l
                        .expect("EVAL_RIGHT_S's task_val is always an Ap-shaped pair");
                    *val = rand_cell
                        .r
                        .expect("EVAL_RIGHT_S's task_val is always an Ap-shaped pair");
                }
                Ok(Some(Region::Apply(op)))
            }
            Tag::Apply => {
                let op = task_val.expect("APPLY always carries a task_val");
                self.pop_cont(task, task_val, next_cont)?;
                Ok(Some(Region::Apply(op)))
            }
            Tag::ApplyT => {
                let op = *val;
                *val = task_val.expect("APPLY_T always carries a task_val");
                self.pop_cont(task, task_val, next_cont)?;
                Ok(Some(Region::Apply(op)))
            }
            Tag::Exit => Ok(None),
            other => Err(EvalError::Bug(format!(
                "dispatch: invalid continuation task tag {:?}",
                other
            ))),
        }
    }

    /// `apply:` — the operator apply table. Each arm mirrors one `case` of
    /// the reference interpreter's `switch (op->t)`.
    fn step_apply(
        &mut self,
        op: CellRef,
        val: &mut CellRef,
        task: &mut Tag,
        task_val: &mut Link,
        next_cont: &mut Link,
    ) -> Result<Region> {
        let mut roots = [Some(*val), *task_val, *next_cont, Some(op)];
        self.heap.ensure_capacity(1, &mut roots)?;
        *val = roots[0].expect("val root never cleared");
        *task_val = roots[1];
        *next_cont = roots[2];
        let op = roots[3].expect("op root never cleared");

        match self.heap.tag(op) {
            Tag::I => Ok(Region::Dispatch),
            Tag::Dot => {
                self.io.write_byte(self.heap.cell(op).ch);
                Ok(Region::Dispatch)
            }
            Tag::K1 => {
                *val = self.heap.cell(op).l.expect("K1 always carries a child");
                Ok(Region::Dispatch)
            }
            Tag::K => {
                *val = self.heap.alloc_unary(Tag::K1, *val);
                Ok(Region::Dispatch)
            }
            Tag::S2 => {
                let opl = self.heap.cell(op).l.expect("S2 always carries both children");
                let opr = self.heap.cell(op).r.expect("S2 always carries both children");
                let e2 = self.heap.alloc_binary(Tag::Ap, opr, *val);
                self.push_cont(task, task_val, next_cont, Tag::EvalRightS, Some(e2));
                Ok(Region::Apply(opl))
            }
            Tag::B2 => {
                let opl = self.heap.cell(op).l.expect("B2 always carries both children");
                let opr = self.heap.cell(op).r.expect("B2 always carries both children");
                if self.heap.tag(opl) == Tag::D {
                    let e2 = self.heap.alloc_binary(Tag::Ap, opr, *val);
                    *val = self.heap.alloc_unary(Tag::D1, e2);
                    Ok(Region::Dispatch)
                } else {
                    self.push_cont(task, task_val, next_cont, Tag::Apply, Some(opl));
                    Ok(Region::Apply(opr))
                }
            }
            Tag::C2 => {
                let opl = self.heap.cell(op).l.expect("C2 always carries both children");
                let opr = self.heap.cell(op).r.expect("C2 always carries both children");
                self.push_cont(task, task_val, next_cont, Tag::ApplyT, Some(opr));
                Ok(Region::Apply(opl))
            }
            Tag::V2 => {
                let v = self.heap.cell(op).l.expect("V2 always carries both children");
                let opr = self.heap.cell(op).r.expect("V2 always carries both children");
                self.push_cont(task, task_val, next_cont, Tag::ApplyT, Some(opr));
                let new_op = *val;
                *val = v;
                Ok(Region::Apply(new_op))
            }
            Tag::S1 => {
                let opl = self.heap.cell(op).l.expect("S1 always carries a child");
                *val = if self.heap.tag(*val) == Tag::K1 {
                    let val_l = self.heap.cell(*val).l.expect("K1 always carries a child");
                    if self.heap.tag(opl) == Tag::I {
                        self.heap.alloc_unary(Tag::T1, val_l)
                    } else if self.heap.tag(opl) == Tag::T1 {
                        let opl_l = self.heap.cell(opl).l.expect("T1 always carries a child");
                        self.heap.alloc_binary(Tag::V2, opl_l, val_l)
                    } else {
                        self.heap.alloc_binary(Tag::C2, opl, val_l)
                    }
                } else {
                    self.heap.alloc_binary(Tag::S2, opl, *val)
                };
                Ok(Region::Dispatch)
            }
            Tag::B1 => {
                let opl = self.heap.cell(op).l.expect("B1 always carries a child");
                *val = self.heap.alloc_binary(Tag::B2, opl, *val);
                Ok(Region::Dispatch)
            }
            Tag::T1 => {
                let v = self.heap.cell(op).l.expect("T1 always carries a child");
                let new_op = *val;
                *val = v;
                Ok(Region::Apply(new_op))
            }
            Tag::S => {
                *val = if self.heap.tag(*val) == Tag::K1 {
                    let val_l = self.heap.cell(*val).l.expect("K1 always carries a child");
                    self.heap.alloc_unary(Tag::B1, val_l)
                } else {
                    self.heap.alloc_unary(Tag::S1, *val)
                };
                Ok(Region::Dispatch)
            }
            Tag::V => {
                *val = op;
                Ok(Region::Dispatch)
            }
            Tag::D1 => {
                self.push_cont(task, task_val, next_cont, Tag::ApplyT, Some(*val));
                *val = self.heap.cell(op).l.expect("D1 always carries a child");
                Ok(Region::Eval)
            }
            Tag::D => {
                *val = self.heap.alloc_unary(Tag::D1, *val);
                Ok(Region::Dispatch)
            }
            Tag::Cont => {
                *next_cont = self.heap.cell(op).l;
                self.pop_cont(task, task_val, next_cont)?;
                Ok(Region::Dispatch)
            }
            Tag::C => {
                self.push_cont(task, task_val, next_cont, Tag::Apply, Some(*val));
                let captured = next_cont.expect("push_cont always leaves next_cont populated");
                *val = self.heap.alloc_unary(Tag::Cont, captured);
                Ok(Region::Dispatch)
            }
            Tag::E => {
                *task = Tag::Exit;
                Ok(Region::Dispatch)
            }
            Tag::At => {
                self.current_ch = self.io.read_byte();
                self.push_cont(task, task_val, next_cont, Tag::Apply, Some(*val));
                *val = if self.current_ch.is_none() {
                    self.v_ref
                } else {
                    self.i_ref
                };
                Ok(Region::Dispatch)
            }
            Tag::Ques => {
                let target = self.heap.cell(op).ch;
                self.push_cont(task, task_val, next_cont, Tag::Apply, Some(*val));
                *val = if self.current_ch == Some(target) {
                    self.i_ref
                } else {
                    self.v_ref
                };
                Ok(Region::Dispatch)
            }
            Tag::Pipe => {
                self.push_cont(task, task_val, next_cont, Tag::Apply, Some(*val));
                *val = match self.current_ch {
                    None => self.v_ref,
                    Some(byte) => self.heap.alloc_char(Tag::Dot, byte),
                };
                Ok(Region::Dispatch)
            }
            other => Err(EvalError::Bug(format!(
                "apply: invalid operator tag {:?}",
                other
            ))),
        }
    }
}
