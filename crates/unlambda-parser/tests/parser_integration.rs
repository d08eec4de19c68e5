//! Integration tests exercising the reader the way `unlambda-cli` will:
//! parsing whole small programs from a byte slice.

use unlambda_heap::{Heap, HeapConfig, Tag};
use unlambda_parser::parse;

fn heap() -> Heap {
    Heap::new(HeapConfig::default()).unwrap()
}

#[test]
fn chain_of_output_atoms_parses() {
    // A right-associated chain of six atoms, printing "Hello" then
    // evaluating to `i` — exercises the fold loop walking several stack
    // frames deep before the expression finally closes.
    let src = "`.H`.e`.l`.l`.oi";
    let mut h = heap();
    let (root, _atoms) = parse(src.as_bytes(), &mut h).expect("valid program parses");
    assert_eq!(h.tag(root), Tag::Ap);
    let first = h.cell(root).l.expect("outermost application has a left child");
    assert_eq!(h.tag(first), Tag::Dot);
    assert_eq!(h.cell(first).ch, b'H');
}

#[test]
fn identity_combinator_alone() {
    let mut h = heap();
    let (root, atoms) = parse("i".as_bytes(), &mut h).unwrap();
    assert_eq!(root, atoms.i);
}

#[test]
fn deeply_nested_application_does_not_panic() {
    let mut src = String::new();
    for _ in 0..500 {
        src.push('`');
    }
    src.push('i');
    for _ in 0..500 {
        src.push('i');
    }
    let mut h = heap();
    let (root, _atoms) = parse(src.as_bytes(), &mut h).expect("deep nesting parses");
    assert_eq!(h.tag(root), Tag::Ap);
}

#[test]
fn trailing_comment_with_no_newline_is_eof() {
    let mut h = heap();
    let result = parse("i\n# unterminated comment".as_bytes(), &mut h);
    // The leading `i` alone is already a complete program; the trailing
    // comment is never consumed because parse() returns as soon as the
    // stack empties.
    assert!(result.is_ok());
}
