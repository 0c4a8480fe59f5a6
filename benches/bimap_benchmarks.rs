use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wabi_bimap::{BiMap, LocalBiMap};

const N: usize = 10_000;
const PAGE: usize = 50;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<u64> {
    (0..n as u64).collect()
}

fn random_keys(n: usize) -> Vec<u64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push(x >> 33);
    }
    keys
}

fn filled(keys: &[u64]) -> LocalBiMap<u64, u64, ()> {
    keys.iter().map(|&k| (k, !k)).collect()
}

// ─── Write path ─────────────────────────────────────────────────────────────

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");

    for (name, keys) in [("ordered", ordered_keys(N)), ("random", random_keys(N))] {
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter(|| {
                let mut map: LocalBiMap<u64, u64, ()> = LocalBiMap::with_capacity(N);
                for &k in &keys {
                    map.set(k, !k);
                }
                map
            });
        });
    }

    group.bench_function(BenchmarkId::new("value_collisions", N), |b| {
        b.iter(|| {
            let mut map: LocalBiMap<u64, u64, ()> = LocalBiMap::new();
            for k in 0..N as u64 {
                map.set(k, k % 64);
            }
            map
        });
    });

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("delete");

    group.bench_function(BenchmarkId::new("random", N), |b| {
        b.iter_batched(
            || filled(&keys),
            |mut map| {
                for k in &keys {
                    map.delete(k);
                }
                map
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Read path ──────────────────────────────────────────────────────────────

fn bench_lookup(c: &mut Criterion) {
    let keys = random_keys(N);
    let map = filled(&keys);
    let mut group = c.benchmark_group("lookup");

    group.bench_function(BenchmarkId::new("get", N), |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for k in &keys {
                if let Some(&v) = map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("get_by_value", N), |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for k in &keys {
                if let Some(&owner) = map.get_by_value(&!k) {
                    sum = sum.wrapping_add(owner);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_get_range(c: &mut Criterion) {
    let map = BiMap::from(filled(&random_keys(N)));
    let len = map.len() as i64;
    let mut group = c.benchmark_group("get_range");

    for start in [0, len / 2, len - PAGE as i64] {
        group.bench_function(BenchmarkId::new("page", start), |b| {
            b.iter(|| map.get_range(start, PAGE as i64).map(|page| page.len()));
        });
    }

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(write_benches, bench_set, bench_delete);

criterion_group!(read_benches, bench_lookup, bench_get_range);

criterion_main!(write_benches, read_benches);
