// ==============================================
// BOUNDED CACHE CONCURRENCY TESTS (integration)
// ==============================================
//
// Multi-threaded behaviour of BoundedCache and InstanceRegistry. These need
// real threads and cannot live inline.

#![cfg(feature = "concurrency")]

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use boundcache::prelude::*;

// ==============================================
// Mixed workload
// ==============================================

mod mixed_workload {
    use super::*;

    fn hammer<P: RecencyPolicy>(cache: BoundedCache<u64, u64, P>, threads: u64, ops: u64) {
        let barrier = Arc::new(Barrier::new(threads as usize));
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let cache = cache.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..ops {
                        let key = (t * 7919 + i * 31) % 256;
                        match i % 5 {
                            0 | 1 => {
                                cache.set(key, key);
                            },
                            2 => {
                                if let Ok(value) = cache.get(&key) {
                                    assert_eq!(*value, key);
                                }
                            },
                            3 => {
                                let _ = cache.get_or_default(&key, key);
                            },
                            _ => {
                                let _ = cache.pop(&key);
                            },
                        }
                        assert!(cache.len() <= cache.capacity());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        let lookups_per_thread = (0..ops).filter(|i| matches!(i % 5, 2 | 3)).count() as u64;
        assert_eq!(stats.lookups(), threads * lookups_per_thread);
        assert!(stats.soft_miss_count <= stats.miss_count);
        assert!(cache.len() <= cache.capacity());
        for (key, value) in cache.snapshot() {
            assert_eq!(key, *value);
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn lri_stays_consistent_under_contention() {
        hammer(Lri::try_new(32).unwrap(), 8, 5_000);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn lru_stays_consistent_under_contention() {
        hammer(Lru::try_new(32).unwrap(), 8, 5_000);
    }

    // Each thread owns a disjoint key range, so every interleaving serializes
    // to the same final content.
    fn disjoint_ranges<P: RecencyPolicy>(cache: BoundedCache<u64, u64, P>) {
        const THREADS: u64 = 8;
        const PER_THREAD: u64 = 8;
        assert_eq!(cache.capacity() as u64, THREADS * PER_THREAD);

        let barrier = Arc::new(Barrier::new(THREADS as usize));
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let cache = cache.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let base = t * PER_THREAD;
                    for key in base..base + PER_THREAD {
                        cache.set(key, key * 10);
                        assert_eq!(*cache.get(&key).unwrap(), key * 10);
                    }
                    cache.delete(&base).unwrap();
                    assert!(matches!(cache.delete(&base), Err(CacheError::KeyNotFound)));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut keys = cache.keys();
        keys.sort_unstable();
        let expected: Vec<u64> = (0..THREADS * PER_THREAD)
            .filter(|k| k % PER_THREAD != 0)
            .collect();
        assert_eq!(keys, expected);
        assert_eq!(cache.len(), expected.len());
        for key in &expected {
            assert_eq!(cache.peek(key).map(|v| *v), Some(key * 10));
        }

        let stats = cache.stats();
        assert_eq!(stats.hit_count, THREADS * PER_THREAD);
        assert_eq!(stats.miss_count, 0);
        cache.check_invariants().unwrap();
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn lri_disjoint_ranges_end_in_expected_state() {
        disjoint_ranges(Lri::try_new(64).unwrap());
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn lru_disjoint_ranges_end_in_expected_state() {
        disjoint_ranges(Lru::try_new(64).unwrap());
    }
}

// ==============================================
// Miss loader re-entrancy
// ==============================================

mod reentrancy {
    use super::*;

    #[cfg_attr(miri, ignore)]
    #[test]
    fn loader_reading_and_writing_the_cache_does_not_deadlock() {
        let shared: Lru<u32, u32> = Lru::try_new(64).unwrap();
        let side = shared.clone();
        let cache: Lru<u32, u32> =
            Lru::with_on_miss(NonZeroUsize::new(64).unwrap(), move |k: &u32| {
                side.set(*k + 10_000, *k);
                let _ = side.peek(k);
                let _ = side.get(&(*k + 10_000));
                Ok(*k + 1)
            });

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for k in 0..50u32 {
                        assert_eq!(*cache.get(&(t * 100 + k)).unwrap(), t * 100 + k + 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(shared.len() <= 64);
        assert!(shared.hit_count() > 0);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn running_loader_does_not_block_other_keys() {
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let (loader_entered, loader_release) = (Arc::clone(&entered), Arc::clone(&release));
        let cache: Lri<u32, u32> =
            Lri::with_on_miss(NonZeroUsize::new(8).unwrap(), move |k: &u32| {
                if *k == 0 {
                    loader_entered.wait();
                    loader_release.wait();
                }
                Ok(*k)
            });
        cache.set(1, 1);

        let loading = {
            let cache = cache.clone();
            thread::spawn(move || *cache.get(&0).unwrap())
        };
        entered.wait();
        assert_eq!(*cache.get(&1).unwrap(), 1);
        cache.set(2, 2);
        release.wait();

        assert_eq!(loading.join().unwrap(), 0);
        assert_eq!(cache.keys(), vec![1, 2, 0]);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn loader_result_overwrites_concurrent_set() {
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let (loader_entered, loader_release) = (Arc::clone(&entered), Arc::clone(&release));
        let cache: Lru<u32, &'static str> =
            Lru::with_on_miss(NonZeroUsize::new(4).unwrap(), move |_k: &u32| {
                loader_entered.wait();
                loader_release.wait();
                Ok("loaded")
            });

        let reader = {
            let cache = cache.clone();
            thread::spawn(move || *cache.get(&7).unwrap())
        };
        entered.wait();
        cache.set(7, "direct");
        release.wait();

        assert_eq!(reader.join().unwrap(), "loaded");
        assert_eq!(cache.peek(&7).map(|v| *v), Some("loaded"));
    }
}

// ==============================================
// Iteration and equality under concurrency
// ==============================================

mod readers {
    use super::*;

    #[cfg_attr(miri, ignore)]
    #[test]
    fn iterator_sees_a_consistent_snapshot() {
        let cache: Lri<u32, u32> = Lri::try_new(128).unwrap();
        cache.update((0..128).map(|i| (i, i)));

        let writer = {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 128..1_128u32 {
                    cache.set(i, i);
                }
            })
        };

        for _ in 0..50 {
            let keys: Vec<u32> = cache.iter().map(|(k, _)| k).collect();
            assert_eq!(keys.len(), 128);
            assert!(keys.windows(2).all(|w| w[0] + 1 == w[1]));
        }
        writer.join().unwrap();
        assert_eq!(cache.keys().first(), Some(&1_000));
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn cross_comparison_does_not_deadlock() {
        let left: Lru<u32, u32> = Lru::try_new(16).unwrap();
        let right: Lri<u32, u32> = Lri::try_new(16).unwrap();
        left.update((0..16).map(|i| (i, i)));
        right.update((0..16).map(|i| (i, i)));

        let (l, r) = (left.clone(), right.clone());
        let a = thread::spawn(move || (0..500).filter(|_| l == r).count());
        let (l, r) = (left.clone(), right.clone());
        let b = thread::spawn(move || (0..500).filter(|_| r == l).count());

        assert_eq!(a.join().unwrap(), 500);
        assert_eq!(b.join().unwrap(), 500);
    }
}

// ==============================================
// Instance registry
// ==============================================

mod registry {
    use super::*;

    #[cfg_attr(miri, ignore)]
    #[test]
    fn racing_factory_calls_converge_on_one_instance() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let registry = Arc::new(InstanceRegistry::new(move |name: &&'static str| {
            counter.fetch_add(1, Ordering::SeqCst);
            format!("engine:{name}")
        }));

        let barrier = Arc::new(Barrier::new(6));
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.get_or_create("primary")
                })
            })
            .collect();
        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
        assert!(builds.load(Ordering::SeqCst) >= 1);
        assert_eq!(registry.len(), 1);

        drop(instances);
        assert_eq!(registry.purge_unshared(), 1);
    }
}
