//! Benchmarks for encoding and decoding the persisted note document.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sidenote::notes::{Document, Line};

fn sample_document() -> Document {
    Document::from_lines(
        (0..500)
            .map(|i| {
                let checkbox = (i % 3 == 0).then_some(i % 2 == 0);
                Line::from_text(&format!("line {i}: remember the thing"), checkbox)
            })
            .collect(),
    )
}

fn bench_to_snapshot(c: &mut Criterion) {
    let document = sample_document();

    c.bench_function("to_snapshot", |b| {
        b.iter(|| black_box(&document).to_snapshot().unwrap());
    });
}

fn bench_from_snapshot(c: &mut Criterion) {
    let snapshot = sample_document().to_snapshot().unwrap();

    c.bench_function("from_snapshot", |b| {
        b.iter(|| Document::from_snapshot(black_box(&snapshot)).unwrap());
    });
}

criterion_group!(benches, bench_to_snapshot, bench_from_snapshot);
criterion_main!(benches);
