//! The cell model — the sole heap object and its tag space.
//!
//! A [`Cell`] is deliberately featureless: every variant of program state
//! (values, partial applications, continuation frames, and the GC's own
//! forwarding record) is the same five-field struct, distinguished only by
//! [`Tag`]. No code outside this module and `heap`/`collect` inspects more
//! than `l`, `r`, and `ch`.

/// Either a young-generation or an old-generation slot.
///
/// The original C interpreter addresses cells with raw `Cell*` pointers, so
/// a pointer into young semispace 0 and one into young semispace 1 are
/// simply different addresses — there is no ambiguity about which array a
/// pointer reaches into. An index alone does not carry that distinction, and
/// "the currently active semispace" is not a substitute for it: a root or a
/// not-yet-scanned child can still point into the semispace that *was*
/// active before a collection swapped the roles, so the buffer a given
/// index belongs to must travel with the index itself. Hence `Young` is a
/// `(buffer, offset)` pair rather than a bare offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRef {
    /// Index into young semispace `buffer` (0 or 1).
    Young(u8, u32),
    /// Index into the old generation.
    Old(u32),
}

/// `l`/`r` field value: a cell reference, or null.
pub type Link = Option<CellRef>;

/// The tag space.
///
/// Three disjoint families share this enum: expression/value tags (what the
/// evaluator computes over), continuation-frame tags (nodes in the saved
/// continuation chain), and the single GC tag `Copied` (a forwarding
/// pointer left behind by a minor collection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    // --- atomic combinators: nullary, shared, immortal in old space ---
    I,
    K,
    S,
    V,
    D,
    C,
    E,
    At,
    Pipe,

    // --- character primitives ---
    Dot,
    Ques,

    // --- partial applications / closures ---
    K1,
    S1,
    B1,
    T1,
    S2,
    B2,
    C2,
    V2,
    D1,

    /// Reified continuation. `l` points at the head of a saved
    /// continuation chain (or is `None` for the top-level chain).
    Cont,

    /// Unreduced application node `` `xy ``. `l` = operator, `r` = operand.
    Ap,

    // --- continuation-frame tags ---
    EvalRight,
    EvalRightS,
    Apply,
    ApplyT,
    Exit,

    /// GC forwarding record. `l` points at the relocated cell.
    Copied,
}

impl Tag {
    /// Tags whose only live child field is `l`.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Tag::K1 | Tag::S1 | Tag::B1 | Tag::D1 | Tag::T1 | Tag::Cont
        )
    }

    /// Tags with two live child fields, `l` and `r`.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Tag::Ap
                | Tag::S2
                | Tag::B2
                | Tag::C2
                | Tag::V2
                | Tag::EvalRight
                | Tag::EvalRightS
                | Tag::Apply
                | Tag::ApplyT
        )
    }

    /// Leaves: no child fields at all.
    pub fn is_leaf(self) -> bool {
        !self.is_unary() && !self.is_binary() && self != Tag::Copied
    }
}

/// The sole heap object.
///
/// `age` runs `0..=AGE_MAX+1`: `AGE_MAX+1` marks a cell as living in the
/// old generation (never relocated again); anything at or below `AGE_MAX`
/// lives in a young semispace and is a candidate for copying/promotion on
/// the next minor collection. `mark` is scratch state for the mark-sweep
/// phase of a major collection and otherwise meaningless.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub tag: Tag,
    pub l: Link,
    pub r: Link,
    pub ch: u8,
    pub age: u8,
    pub mark: bool,
}

impl Cell {
    pub fn leaf(tag: Tag) -> Self {
        Cell {
            tag,
            l: None,
            r: None,
            ch: 0,
            age: 0,
            mark: false,
        }
    }

    pub fn unary(tag: Tag, l: CellRef) -> Self {
        Cell {
            tag,
            l: Some(l),
            r: None,
            ch: 0,
            age: 0,
            mark: false,
        }
    }

    pub fn binary(tag: Tag, l: CellRef, r: CellRef) -> Self {
        Cell {
            tag,
            l: Some(l),
            r: Some(r),
            ch: 0,
            age: 0,
            mark: false,
        }
    }

    pub fn char_cell(tag: Tag, ch: u8) -> Self {
        Cell {
            tag,
            l: None,
            r: None,
            ch,
            age: 0,
            mark: false,
        }
    }

    /// A cell with every field zeroed; used only to pre-fill the fixed-size
    /// young semispaces so that bump allocation never needs to grow a Vec.
    pub fn empty() -> Self {
        Cell::leaf(Tag::I)
    }
}
