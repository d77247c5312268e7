use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use cuckoo::CuckooFilter;

const N_KEYS: u32 = 5_000;

fn cuckoo_add_benchmark(c: &mut Criterion) {
    c.bench_function("cuckoo_add_5k", |b| {
        b.iter_batched(
            || CuckooFilter::new(N_KEYS as u64, 4, 500, true).unwrap(),
            |mut cf| {
                for i in 0..N_KEYS {
                    cf.add(&i.to_le_bytes()).unwrap();
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn cuckoo_contains_hit_benchmark(c: &mut Criterion) {
    c.bench_function("cuckoo_contains_hit_5k", |b| {
        b.iter_batched(
            || {
                let mut cf = CuckooFilter::new(N_KEYS as u64, 4, 500, true).unwrap();
                for i in 0..N_KEYS {
                    cf.add(&i.to_le_bytes()).unwrap();
                }
                cf
            },
            |cf| {
                for i in 0..N_KEYS {
                    assert!(cf.contains(&i.to_le_bytes()));
                }
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, cuckoo_add_benchmark, cuckoo_contains_hit_benchmark);
criterion_main!(benches);
