//! The reader itself: turns a byte stream into a single cell-graph
//! expression plus the shared atom table, with no recursion and no
//! intermediate token representation.
//!
//! Grounded directly on the reference interpreter's `parse()`: an operand
//! stack of partially-built `` ` `` (application) cells, each created with
//! its left child empty and its right child threaded to the previous stack
//! frame. Reading a fresh value walks up the stack filling in empty left
//! children and chaining filled cells upward as completed right children,
//! until either an empty slot remains (more input needed) or the stack runs
//! out (the expression is complete). This needs no operator precedence or
//! recursive descent because Unlambda's grammar has exactly one binary
//! production and no other structure.
//!
//! Every cell a program's source text produces is allocated directly in
//! the old generation via [`Heap::alloc_old`] — the reader has no notion of
//! a minor-collection root set, so nothing it builds can be young.
//!
//! Emits a single `tracing::debug!` event once parsing completes, with the
//! total cell count — cheap enough to always compute, useful for spotting
//! surprisingly large programs without instrumenting every call site.

use std::io::Read;

use unlambda_heap::{CellRef, Heap, Link, Tag};

use crate::atoms::Atoms;
use crate::cursor::Cursor;
use crate::error::{ParseError, Result};

/// Read one complete Unlambda expression from `reader`, returning its root
/// cell and the shared atom table used while parsing (the evaluator needs
/// the latter too, e.g. to recognize `i`/`v` without allocating fresh
/// cells for them).
pub fn parse<R: Read>(reader: R, heap: &mut Heap) -> Result<(CellRef, Atoms)> {
    let atoms = Atoms::allocate(heap);
    let mut cursor = Cursor::new(reader);
    let mut stack: Link = None;

    let mut cell_count: u64 = 0;

    loop {
        let ch = cursor.next_significant_byte()?.ok_or_else(|| {
            // Reaching end of input with an empty stack can only happen on
            // the very first atom: once a `` ` `` has been opened, the
            // stack stays non-empty until the fold that drains it returns
            // the completed expression directly, so this branch is never
            // taken mid-expression. An empty stack here means the whole
            // stream held nothing but whitespace and comments, or nothing
            // at all.
            if stack.is_none() {
                ParseError::EmptyProgram
            } else {
                ParseError::UnexpectedEof {
                    line: cursor.line(),
                    column: cursor.column(),
                }
            }
        })?;

        let mut e = match ch {
            b'`' => {
                stack = Some(heap.alloc_old(Tag::Ap, None, stack, 0));
                cell_count += 1;
                continue;
            }
            b'i' | b'I' => atoms.i,
            b'k' | b'K' => atoms.k,
            b's' | b'S' => atoms.s,
            b'v' | b'V' => atoms.v,
            b'd' | b'D' => atoms.d,
            b'c' | b'C' => atoms.c,
            b'e' | b'E' => atoms.e,
            b'@' => atoms.at,
            b'|' => atoms.pipe,
            b'r' | b'R' => {
                cell_count += 1;
                heap.alloc_old(Tag::Dot, None, None, b'\n')
            }
            b'.' | b'?' => {
                let ch2 = cursor.next_byte()?.ok_or(ParseError::UnexpectedEof {
                    line: cursor.line(),
                    column: cursor.column(),
                })?;
                let tag = if ch == b'.' { Tag::Dot } else { Tag::Ques };
                cell_count += 1;
                heap.alloc_old(tag, None, None, ch2)
            }
            other => {
                return Err(ParseError::UnexpectedChar {
                    ch: other as char,
                    line: cursor.line(),
                    column: cursor.column(),
                })
            }
        };

        // Fold `e` into the pending application stack: fill the first
        // empty left child we find, chaining completed cells upward as
        // right children of the frame above them.
        loop {
            let Some(top) = stack else {
                tracing::debug!(cell_count, "parse complete");
                return Ok((e, atoms));
            };
            if heap.cell(top).l.is_none() {
                heap.cell_mut(top).l = Some(e);
                break;
            }
            let next = heap.cell(top).r;
            heap.cell_mut(top).r = Some(e);
            e = top;
            stack = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unlambda_heap::{HeapConfig, Tag};

    fn parse_str(src: &str) -> (CellRef, Atoms, Heap) {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let (root, atoms) = parse(src.as_bytes(), &mut heap).unwrap();
        (root, atoms, heap)
    }

    #[test]
    fn single_atom() {
        let (root, atoms, heap) = parse_str("i");
        assert_eq!(root, atoms.i);
        assert_eq!(heap.tag(root), Tag::I);
    }

    #[test]
    fn single_application() {
        let (root, atoms, heap) = parse_str("`ki");
        assert_eq!(heap.tag(root), Tag::Ap);
        assert_eq!(heap.cell(root).l, Some(atoms.k));
        assert_eq!(heap.cell(root).r, Some(atoms.i));
    }

    #[test]
    fn right_associative_chain() {
        // ``si i  parses as (s i) applied to i
        let (root, atoms, heap) = parse_str("``sii");
        assert_eq!(heap.tag(root), Tag::Ap);
        let inner = heap.cell(root).l.unwrap();
        assert_eq!(heap.tag(inner), Tag::Ap);
        assert_eq!(heap.cell(inner).l, Some(atoms.s));
        assert_eq!(heap.cell(inner).r, Some(atoms.i));
        assert_eq!(heap.cell(root).r, Some(atoms.i));
    }

    #[test]
    fn whitespace_and_comments_are_skipped() {
        let (root, atoms, heap) = parse_str("# a comment\n `  k # trailing\n i\n");
        assert_eq!(heap.tag(root), Tag::Ap);
        assert_eq!(heap.cell(root).l, Some(atoms.k));
        assert_eq!(heap.cell(root).r, Some(atoms.i));
    }

    #[test]
    fn case_insensitive_letters() {
        let (root, atoms, heap) = parse_str("`KS");
        assert_eq!(heap.cell(root).l, Some(atoms.k));
        assert_eq!(heap.cell(root).r, Some(atoms.s));
    }

    #[test]
    fn r_sugar_is_newline_dot() {
        let (root, _atoms, heap) = parse_str("r");
        assert_eq!(heap.tag(root), Tag::Dot);
        assert_eq!(heap.cell(root).ch, b'\n');
    }

    #[test]
    fn dot_and_ques_carry_their_argument_byte() {
        let (root, _atoms, heap) = parse_str("`.x.y");
        assert_eq!(heap.tag(root), Tag::Ap);
        let left = heap.cell(root).l.unwrap();
        assert_eq!(heap.tag(left), Tag::Dot);
        assert_eq!(heap.cell(left).ch, b'x');
        let right = heap.cell(root).r.unwrap();
        assert_eq!(heap.tag(right), Tag::Dot);
        assert_eq!(heap.cell(right).ch, b'y');
    }

    #[test]
    fn dot_with_backtick_as_argument() {
        let (root, _atoms, heap) = parse_str(".`");
        assert_eq!(heap.tag(root), Tag::Dot);
        assert_eq!(heap.cell(root).ch, b'`');
    }

    #[test]
    fn unterminated_application_is_eof_error() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let err = parse("`k".as_bytes(), &mut heap).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn completely_empty_input_is_an_empty_program_error() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let err = parse("".as_bytes(), &mut heap).unwrap_err();
        assert!(matches!(err, ParseError::EmptyProgram));
    }

    #[test]
    fn input_with_only_whitespace_and_comments_is_an_empty_program_error() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let err = parse("  \n# just a comment\n  ".as_bytes(), &mut heap).unwrap_err();
        assert!(matches!(err, ParseError::EmptyProgram));
    }

    #[test]
    fn unknown_character_is_rejected() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let err = parse("`kz".as_bytes(), &mut heap).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedChar { ch: 'z', .. }));
    }

    #[test]
    fn dot_at_eof_without_argument_is_eof_error() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let err = parse(".".as_bytes(), &mut heap).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn every_parsed_cell_is_immortal_old_generation() {
        let (root, _atoms, heap) = parse_str("```skk i i");
        assert!(matches!(root, CellRef::Old(_)));
    }
}
