//! Correctness tests for the cell heap and collector.
//!
//! Each test targets one invariant of the heap's data model or collector
//! behavior, in an arrange/act/assert structure, exercising an
//! index-based heap instead of raw addresses.

use unlambda_heap::{CellRef, Heap, HeapConfig, Link, Tag};

fn heap() -> Heap {
    Heap::new(HeapConfig::small_for_tests()).expect("small test config always validates")
}

/// A cell surviving a minor collection keeps its tag and children reachable
/// through the forwarded reference, even though its physical slot changed.
#[test]
fn minor_collection_preserves_reachable_structure() {
    let mut h = heap();
    let leaf = h.alloc_leaf(Tag::K);
    let app = h.alloc_unary(Tag::K1, leaf);

    let mut roots: Vec<Link> = vec![Some(app)];
    h.minor_collect(&mut roots).expect("minor collection");

    let new_app = roots[0].expect("root survives");
    assert_eq!(h.tag(new_app), Tag::K1);
    let new_leaf = h.cell(new_app).l.expect("K1 keeps its child");
    assert_eq!(h.tag(new_leaf), Tag::K);
}

/// A cell unreachable from any root does not survive a minor collection —
/// the two live roots below must end up with distinct (non-colliding)
/// forwarded addresses, and nothing else should have been kept alive.
#[test]
fn unreachable_cells_are_not_resurrected_by_collection() {
    let mut h = heap();
    let garbage = h.alloc_leaf(Tag::S);
    let kept = h.alloc_leaf(Tag::K);
    let _ = garbage;

    let mut roots: Vec<Link> = vec![Some(kept)];
    h.minor_collect(&mut roots).expect("minor collection");

    assert_eq!(roots.len(), 1);
    let new_kept = roots[0].expect("kept root survives");
    assert_eq!(h.tag(new_kept), Tag::K);
    // Exactly one cell should have been copied: free_ptr should be 1, not 2.
    assert_eq!(h.young_remaining(), h.config().young_size - 1);
}

/// A cell that survives `age_max` minor collections is promoted into the
/// old generation and its reference becomes `CellRef::Old`.
#[test]
fn cell_is_promoted_after_age_max_collections() {
    let mut h = heap();
    let mut root = h.alloc_leaf(Tag::V);
    let age_max = h.config().age_max;

    let mut roots: Vec<Link> = vec![Some(root)];
    for _ in 0..=age_max {
        h.minor_collect(&mut roots).expect("minor collection");
        root = roots[0].expect("root survives every collection");
    }

    assert!(
        matches!(root, CellRef::Old(_)),
        "cell should have been promoted to the old generation after {} collections, got {:?}",
        age_max + 1,
        root
    );
}

/// Shared structure reachable from two distinct roots is copied once: both
/// roots must end up pointing at the *same* new location, not two copies.
#[test]
fn shared_subgraph_is_copied_exactly_once() {
    let mut h = heap();
    let shared = h.alloc_leaf(Tag::I);
    let left = h.alloc_unary(Tag::K1, shared);
    let right = h.alloc_unary(Tag::S1, shared);

    let mut roots: Vec<Link> = vec![Some(left), Some(right)];
    h.minor_collect(&mut roots).expect("minor collection");

    let new_left = roots[0].unwrap();
    let new_right = roots[1].unwrap();
    let left_child = h.cell(new_left).l.unwrap();
    let right_child = h.cell(new_right).l.unwrap();
    assert_eq!(
        left_child, right_child,
        "shared child must forward to a single location, not be duplicated"
    );
}

/// A binary cell's `l` and `r` children are each relocated independently;
/// neither field is silently dropped.
#[test]
fn binary_cell_keeps_both_children_after_collection() {
    let mut h = heap();
    let l = h.alloc_leaf(Tag::K);
    let r = h.alloc_leaf(Tag::S);
    let ap = h.alloc_binary(Tag::Ap, l, r);

    let mut roots: Vec<Link> = vec![Some(ap)];
    h.minor_collect(&mut roots).expect("minor collection");

    let new_ap = roots[0].unwrap();
    assert_eq!(h.tag(h.cell(new_ap).l.unwrap()), Tag::K);
    assert_eq!(h.tag(h.cell(new_ap).r.unwrap()), Tag::S);
}

/// A major collection triggered mid-promotion must leave every root from
/// that same minor collection intact — the nested collection must not lose
/// track of in-flight roots.
#[test]
fn major_collection_during_promotion_preserves_roots() {
    let mut h = heap();
    let chunk = h.config().heap_chunk_size;
    let age_max = h.config().age_max;

    // Exhaust the old free list so the next promotion is forced to run a
    // major collection mid-minor-collection.
    let mut holders = Vec::new();
    for _ in 0..chunk {
        holders.push(h.alloc_old_leaf(Tag::I));
    }

    let mut root = h.alloc_leaf(Tag::V);
    let mut roots: Vec<Link> = vec![Some(root)];
    roots.extend(holders.iter().map(|&c| Some(c)));

    for _ in 0..=age_max {
        h.minor_collect(&mut roots).expect("minor collection");
        root = roots[0].expect("promotion root survives nested major collection");
    }

    assert!(matches!(root, CellRef::Old(_)));
    for held in roots[1..].iter() {
        assert!(held.is_some(), "old-generation holder must survive the sweep");
    }
}
