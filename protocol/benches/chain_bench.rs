//! Benchmarks for block hashing, validation, and append throughput.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use linkchain_protocol::{
    compute_block_hash, validate_candidate, BlockFactory, Chain, ManualClock,
};

fn bench_hash(c: &mut Criterion) {
    let prev = "a".repeat(64);
    let payload = "x".repeat(256);
    c.bench_function("compute_block_hash_256b", |b| {
        b.iter(|| compute_block_hash(black_box(7), black_box(&prev), 1_700_000_000, &payload))
    });
}

fn bench_validate(c: &mut Criterion) {
    let chain = Chain::default();
    let factory = BlockFactory::new(ManualClock::at(1_700_000_000));
    let candidate = factory.create_next(&chain, "bench");
    c.bench_function("validate_candidate", |b| {
        b.iter(|| validate_candidate(black_box(&candidate), chain.tip()))
    });
}

fn bench_append(c: &mut Criterion) {
    let factory = BlockFactory::new(ManualClock::at(1_700_000_000));
    c.bench_function("append_100_blocks", |b| {
        b.iter_batched(
            Chain::default,
            |mut chain| {
                for i in 0..100 {
                    let candidate = factory.create_next(&chain, format!("block {i}"));
                    chain.append(candidate).unwrap();
                }
                chain
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_hash, bench_validate, bench_append);
criterion_main!(benches);
