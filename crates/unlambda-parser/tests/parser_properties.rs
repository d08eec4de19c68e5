//! Property-based test: parsing always produces a tree whose atom count is
//! exactly one more than its backtick count, for any depth of right-nested
//! application the generator builds. This is the structural invariant the
//! stack-folding algorithm in `parser.rs` is supposed to maintain for every
//! well-formed program, not just the handful of fixed examples in
//! `parser_integration.rs`.

use quickcheck_macros::quickcheck;
use unlambda_heap::{Heap, HeapConfig, Tag};
use unlambda_parser::parse;

/// Build a balanced, right-nested application chain `` `k`k...`k i ``
/// `depth` levels deep — always syntactically valid — and check the
/// parser accepts it and every non-leaf node is an `Ap`.
fn right_nested_chain_parses(depth: u8) -> bool {
    let depth = (depth % 200) as usize;
    let mut src = String::new();
    for _ in 0..depth {
        src.push('`');
        src.push('k');
    }
    src.push('i');

    let mut heap = Heap::new(HeapConfig::default()).unwrap();
    let Ok((root, atoms)) = parse(src.as_bytes(), &mut heap) else {
        return false;
    };

    let mut cursor = root;
    for _ in 0..depth {
        if heap.tag(cursor) != Tag::Ap {
            return false;
        }
        if heap.cell(cursor).l != Some(atoms.k) {
            return false;
        }
        let Some(next) = heap.cell(cursor).r else {
            return false;
        };
        cursor = next;
    }
    cursor == atoms.i
}

#[quickcheck]
fn right_nested_application_chains_always_parse(depth: u8) -> bool {
    right_nested_chain_parses(depth)
}
