use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use avl_map::{AvlTreeMap, RemovalRebalance};

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();

    c.bench_function("map_insert", |b| {
        b.iter(|| {
            let mut map = AvlTreeMap::with_capacity(N);
            for value in &values {
                map.insert(*value, *value);
            }
            map
        })
    });

    let map: AvlTreeMap<_, _> = values.iter().map(|value| (*value, *value)).collect();

    c.bench_function("map_get", |b| {
        b.iter(|| {
            for value in &values {
                black_box(map.get(value));
            }
        })
    });

    c.bench_function("map_iter", |b| {
        b.iter(|| {
            for (k, v) in &map {
                black_box((k, v));
            }
        })
    });

    c.bench_function("map_level_order", |b| {
        b.iter(|| {
            for entry in map.level_order() {
                black_box((entry.key, entry.height));
            }
        })
    });

    for (name, policy) in [
        ("map_remove_full_path", RemovalRebalance::FullPath),
        ("map_remove_stop_at_first_rotation", RemovalRebalance::StopAtFirstRotation),
    ] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let mut map = AvlTreeMap::with_removal_rebalance(policy);
                    map.extend(values.iter().map(|value| (*value, *value)));
                    map
                },
                |mut map| {
                    for value in &values {
                        map.remove(value);
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
