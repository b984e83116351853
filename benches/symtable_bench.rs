use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::time::Duration;
use symtable::{HashSymTable, ListSymTable, SymTable};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled<T: SymTable<u64>>(keys: &[String]) -> T {
    let mut t = T::try_new().unwrap();
    for (i, k) in keys.iter().enumerate() {
        t.put(k, i as u64).unwrap();
    }
    t
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[100usize, 1_000] {
        let keys: Vec<_> = lcg(1).take(n).map(key).collect();
        group.bench_with_input(BenchmarkId::new("list", n), &keys, |b, keys| {
            b.iter_batched(
                || ListSymTable::<u64>::new(),
                |mut t| {
                    for (i, k) in keys.iter().enumerate() {
                        t.put(k, i as u64).unwrap();
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("hash", n), &keys, |b, keys| {
            b.iter_batched(
                || HashSymTable::<u64>::new(),
                |mut t| {
                    for (i, k) in keys.iter().enumerate() {
                        t.put(k, i as u64).unwrap();
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

// Crosses every growth step up to 32771 buckets.
fn bench_insert_with_growth(c: &mut Criterion) {
    let keys: Vec<_> = lcg(3).take(20_000).map(key).collect();
    c.bench_function("hash_insert_20k_growing", |b| {
        b.iter_batched(
            || HashSymTable::<u64>::new(),
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.put(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let keys: Vec<_> = lcg(7).take(1_000).map(key).collect();
    let list: ListSymTable<u64> = filled(&keys);
    let hash: HashSymTable<u64> = filled(&keys);

    c.bench_function("list_get_hit_1k", |b| {
        let mut it = keys.iter().cycle();
        b.iter(|| black_box(list.get(it.next().unwrap())))
    });
    c.bench_function("hash_get_hit_1k", |b| {
        let mut it = keys.iter().cycle();
        b.iter(|| black_box(hash.get(it.next().unwrap())))
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let keys: Vec<_> = lcg(11).take(1_000).map(key).collect();
    let hash: HashSymTable<u64> = filled(&keys);
    let mut miss = lcg(0xdead_beef);
    c.bench_function("hash_get_miss_1k", |b| {
        b.iter(|| {
            // generate keys unlikely in the table
            let k = key(miss.next().unwrap());
            black_box(hash.get(&k))
        })
    });
}

fn bench_map(c: &mut Criterion) {
    let keys: Vec<_> = lcg(13).take(10_000).map(key).collect();
    let hash: HashSymTable<u64> = filled(&keys);
    c.bench_function("hash_map_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            hash.map(|_k, v, acc: &mut u64| *acc = acc.wrapping_add(*v), &mut sum);
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_insert_with_growth, bench_get_hit, bench_get_miss, bench_map
}
criterion_main!(benches);
