use bloom::BloomFilter;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

const N_KEYS: usize = 10_000;

fn build_filter() -> BloomFilter {
    let mut bf = BloomFilter::new(N_KEYS as u64, 0.01).unwrap();
    for i in 0..N_KEYS {
        bf.add(format!("key{i}").as_bytes());
    }
    bf
}

fn bloom_add_benchmark(c: &mut Criterion) {
    c.bench_function("bloom_add_10k", |b| {
        b.iter_batched(
            || BloomFilter::new(N_KEYS as u64, 0.01).unwrap(),
            |mut bf| {
                for i in 0..N_KEYS {
                    bf.add(format!("key{i}").as_bytes());
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn bloom_check_hit_benchmark(c: &mut Criterion) {
    c.bench_function("bloom_check_hit_10k", |b| {
        b.iter_batched(
            build_filter,
            |bf| {
                for i in 0..N_KEYS {
                    assert!(bf.check(format!("key{i}").as_bytes()));
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn bloom_check_miss_benchmark(c: &mut Criterion) {
    c.bench_function("bloom_check_miss_10k", |b| {
        b.iter_batched(
            build_filter,
            |bf| {
                for i in 0..N_KEYS {
                    assert!(!bf.check(format!("missing{i}").as_bytes()));
                }
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bloom_add_benchmark,
    bloom_check_hit_benchmark,
    bloom_check_miss_benchmark
);
criterion_main!(benches);
