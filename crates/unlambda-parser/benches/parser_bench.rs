//! Benchmarks for the reader.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unlambda_heap::{Heap, HeapConfig};
use unlambda_parser::parse;

fn deep_chain_source(depth: usize) -> String {
    let mut src = String::with_capacity(depth * 2 + 1);
    for _ in 0..depth {
        src.push('`');
    }
    src.push('i');
    for _ in 0..depth {
        src.push('i');
    }
    src
}

fn bench_parse_deep_chain(c: &mut Criterion) {
    let src = deep_chain_source(2_000);
    c.bench_function("parse_deep_application_chain", |b| {
        b.iter(|| {
            let mut heap = Heap::new(HeapConfig::default()).unwrap();
            let (root, atoms) = parse(black_box(src.as_bytes()), &mut heap).unwrap();
            black_box((root, atoms));
        })
    });
}

criterion_group!(benches, bench_parse_deep_chain);
criterion_main!(benches);
