use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use boundcache::policy::engine::RecencyCore;
use boundcache::policy::{AccessOrder, InsertionOrder, RecencyPolicy};
use boundcache::traits::{CoreCache, RecencyCacheTrait};
use boundcache::{Lri, Lru};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 1024;

fn filled<P: RecencyPolicy>(capacity: usize) -> RecencyCore<u64, u64, P> {
    let mut cache = RecencyCore::try_new(capacity).unwrap();
    for i in 0..capacity as u64 {
        cache.insert(i, Arc::new(i));
    }
    cache
}

fn bench_insert_get<P: RecencyPolicy>(c: &mut Criterion) {
    c.bench_function(&format!("{}_insert_get", P::NAME), |b| {
        b.iter_batched(
            || filled::<P>(CAPACITY),
            |mut cache| {
                for i in 0..CAPACITY as u64 {
                    cache.insert(black_box(i + 10_000), Arc::new(i));
                    let _ = black_box(cache.get(&black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_eviction_churn<P: RecencyPolicy>(c: &mut Criterion) {
    c.bench_function(&format!("{}_eviction_churn", P::NAME), |b| {
        b.iter_batched(
            || filled::<P>(CAPACITY),
            |mut cache| {
                for i in 0..4 * CAPACITY as u64 {
                    cache.insert(black_box(10_000 + i), Arc::new(i));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_pop_oldest<P: RecencyPolicy>(c: &mut Criterion) {
    c.bench_function(&format!("{}_pop_oldest", P::NAME), |b| {
        b.iter_batched(
            || filled::<P>(CAPACITY),
            |mut cache| {
                for _ in 0..CAPACITY {
                    let _ = black_box(cache.pop_oldest());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

/// Skewed key stream: 80% of lookups hit a hot fifth of a keyspace twice
/// the cache size.
fn bench_skewed_workload<P: RecencyPolicy>(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let keys: Vec<u64> = (0..8192)
        .map(|_| {
            let space = 2 * CAPACITY as u64;
            if rng.gen_bool(0.8) {
                rng.gen_range(0..space / 5)
            } else {
                rng.gen_range(0..space)
            }
        })
        .collect();

    c.bench_function(&format!("{}_skewed_get_or_insert", P::NAME), |b| {
        b.iter_batched(
            || filled::<P>(CAPACITY),
            |mut cache| {
                for key in &keys {
                    let _ = black_box(cache.get_or_insert(*key, Arc::new(*key)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_concurrent_mixed(c: &mut Criterion) {
    c.bench_function("bounded_cache_concurrent_mixed_4t", |b| {
        b.iter(|| {
            let lru: Lru<u64, u64> = Lru::try_new(CAPACITY).unwrap();
            let lri: Lri<u64, u64> = Lri::try_new(CAPACITY).unwrap();
            let handles: Vec<_> = (0..4u64)
                .map(|t| {
                    let (lru, lri) = (lru.clone(), lri.clone());
                    thread::spawn(move || {
                        for i in 0..2_000u64 {
                            let key = (t * 997 + i) % (2 * CAPACITY as u64);
                            if i % 4 == 0 {
                                lru.set(key, i);
                                lri.set(key, i);
                            } else {
                                let _ = black_box(lru.get(&key));
                                let _ = black_box(lri.peek(&key));
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        })
    });
}

fn recency_benches(c: &mut Criterion) {
    bench_insert_get::<InsertionOrder>(c);
    bench_insert_get::<AccessOrder>(c);
    bench_eviction_churn::<InsertionOrder>(c);
    bench_eviction_churn::<AccessOrder>(c);
    bench_pop_oldest::<AccessOrder>(c);
    bench_skewed_workload::<InsertionOrder>(c);
    bench_skewed_workload::<AccessOrder>(c);
    bench_concurrent_mixed(c);
}

criterion_group!(benches, recency_benches);
criterion_main!(benches);
