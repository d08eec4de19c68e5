//! Benchmarks for allocation and collection throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unlambda_heap::{Heap, HeapConfig, Link, Tag};

fn bench_allocation(c: &mut Criterion) {
    c.bench_function("alloc_leaf_no_collection", |b| {
        b.iter(|| {
            let mut h = Heap::new(HeapConfig::default()).unwrap();
            let mut roots: Vec<Link> = Vec::new();
            for _ in 0..1_000 {
                black_box(h.alloc_leaf(Tag::I));
            }
            black_box(&mut roots);
        })
    });
}

fn bench_minor_collection(c: &mut Criterion) {
    c.bench_function("minor_collect_long_chain", |b| {
        b.iter(|| {
            let mut h = Heap::new(HeapConfig::small_for_tests()).unwrap();
            let mut head = h.alloc_leaf(Tag::I);
            let mut roots: Vec<Link> = vec![Some(head)];
            for _ in 0..1_000 {
                h.ensure_capacity(4, &mut roots).unwrap();
                head = roots[0].unwrap();
                let next = h.alloc_unary(Tag::K1, head);
                roots[0] = Some(next);
            }
            black_box(roots);
        })
    });
}

criterion_group!(benches, bench_allocation, bench_minor_collection);
criterion_main!(benches);
