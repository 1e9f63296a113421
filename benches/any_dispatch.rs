//! Dispatch-path benchmarks for the inline any cell.
//!
//! Measures the store/retrieve hot path, the clone-assignment path with
//! its rollback staging engaged, and the `CopyAny` byte-copy path for
//! comparison.

use criterion::{Criterion, criterion_group, criterion_main};
use inline_any::{CopyAny, InlineAny};
use std::hint::black_box;

fn bench_assign_u64(c: &mut Criterion) {
    let mut cell: InlineAny<16> = InlineAny::new();

    c.bench_function("inline_any_assign_u64", |b| {
        b.iter(|| {
            cell.assign(black_box(0xABCD_u64));
        });
    });
}

fn bench_get_u64(c: &mut Criterion) {
    let cell = InlineAny::<16>::from_value(17_u64);

    c.bench_function("inline_any_get_u64", |b| {
        b.iter(|| {
            let _value = black_box(cell.get::<u64>().unwrap());
        });
    });
}

fn bench_assign_cloned(c: &mut Criterion) {
    let source = InlineAny::<16>::from_value(99_u64);
    let mut target: InlineAny<16> = InlineAny::new();

    c.bench_function("inline_any_assign_cloned", |b| {
        b.iter(|| {
            target.assign_cloned(black_box(&source));
        });
    });
}

fn bench_type_query(c: &mut Criterion) {
    let cell = InlineAny::<16>::from_value(1_u32);

    c.bench_function("inline_any_is_query", |b| {
        b.iter(|| {
            let _hit = black_box(cell.is::<u32>());
            let _miss = black_box(cell.is::<u64>());
        });
    });
}

fn bench_copy_any_set_get(c: &mut Criterion) {
    let mut cell: CopyAny<16> = CopyAny::new();

    c.bench_function("copy_any_set_get", |b| {
        b.iter(|| {
            cell.set(black_box(7_u64));
            let _value = black_box(cell.get::<u64>().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_assign_u64,
    bench_get_u64,
    bench_assign_cloned,
    bench_type_query,
    bench_copy_any_set_get,
);
criterion_main!(benches);
