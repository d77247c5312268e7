use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sketch::CountMinSketch;

const N_KEYS: u32 = 10_000;

fn sketch_add_benchmark(c: &mut Criterion) {
    c.bench_function("sketch_add_10k", |b| {
        b.iter_batched(
            || CountMinSketch::new(2048, 5).unwrap(),
            |mut cms| {
                for i in 0..N_KEYS {
                    cms.add(&i.to_le_bytes(), 1);
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn sketch_check_benchmark(c: &mut Criterion) {
    c.bench_function("sketch_check_hit_10k", |b| {
        b.iter_batched(
            || {
                let mut cms = CountMinSketch::new(2048, 5).unwrap();
                for i in 0..N_KEYS {
                    cms.add(&i.to_le_bytes(), 1);
                }
                cms
            },
            |cms| {
                for i in 0..N_KEYS {
                    assert!(cms.check(&i.to_le_bytes()) >= 1);
                }
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, sketch_add_benchmark, sketch_check_benchmark);
criterion_main!(benches);
