//! Micro-benchmarks for cache reads and writes.
//!
//! Run with:
//! ```bash
//! cargo bench --bench cache_ops
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nway_cache::cache::Cache;
use nway_cache::indexer::address_of;
use nway_cache::options::Options;
use nway_cache::policy::Policy;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Generate deterministic random keys for reproducible benchmarks.
fn random_keys(seed: u64, count: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.random()).collect()
}

/// Generate deterministic random string keys.
fn random_strings(seed: u64, count: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.random_range(1..16);
            (0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect()
        })
        .collect()
}

// ============================================================================
// Benchmark: Address derivation
// ============================================================================

fn bench_address(c: &mut Criterion) {
    let mut group = c.benchmark_group("address");

    let keys = random_keys(42, 4096);
    let strings = random_strings(42, 4096);

    for bits in [4, 12, 24] {
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("u64", bits), &keys, |b, keys| {
            b.iter(|| keys.iter().map(|key| address_of(key, bits).unwrap_or(0)).sum::<usize>());
        });
        group.bench_with_input(BenchmarkId::new("string", bits), &strings, |b, keys| {
            b.iter(|| keys.iter().map(|key| address_of(key, bits).unwrap_or(0)).sum::<usize>());
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Write (with evictions)
// ============================================================================

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache/write");

    for sets in [1, 4, 16] {
        let options = Options::new(sets, 10).unwrap();
        // Twice the capacity, so half the writes evict.
        let keys = random_keys(42, options.capacity() * 2);

        for policy in Policy::ALL {
            group.throughput(Throughput::Elements(keys.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(policy.name(), format!("{}-way", sets)),
                &keys,
                |b, keys| {
                    b.iter_with_setup(
                        || Cache::<u64, u64, Policy>::with_policy(options, policy),
                        |mut cache| {
                            for &key in keys {
                                cache.write(key, key).unwrap();
                            }
                            cache
                        },
                    );
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Benchmark: Read
// ============================================================================

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache/read");

    for sets in [1, 4, 16] {
        let options = Options::new(sets, 10).unwrap();
        let keys = random_keys(42, options.capacity());

        let mut cache = Cache::<u64, u64>::new(options);
        for &key in &keys {
            cache.write(key, key).unwrap();
        }

        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("mixed", format!("{}-way", sets)), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys {
                    if matches!(cache.read(key), Ok(Some(_))) {
                        hits += 1;
                    }
                }
                hits
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_address, bench_write, bench_read);

criterion_main!(benches);
