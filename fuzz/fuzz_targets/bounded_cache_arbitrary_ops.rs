#![no_main]

use libfuzzer_sys::fuzz_target;
use boundcache::{Lri, Lru};

// Fuzz arbitrary operation sequences on both thread-safe caches
//
// The first byte picks the capacity; each following pair is (op, key). Both
// caches see the same stream and must stay within capacity with consistent
// counters.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 16) + 1;
    let lri: Lri<u8, u8> = Lri::try_new(capacity).unwrap();
    let lru: Lru<u8, u8> = Lru::try_new(capacity).unwrap();

    for chunk in rest.chunks_exact(2) {
        let key = chunk[1] % 32;
        match chunk[0] % 8 {
            0 | 1 => {
                lri.set(key, key);
                lru.set(key, key);
                assert!(lri.contains(&key));
                assert!(lru.contains(&key));
            }
            2 => {
                assert_eq!(lri.get(&key).is_ok(), lri.contains(&key));
                let before = lru.contains(&key);
                assert_eq!(lru.get(&key).is_ok(), before);
            }
            3 => {
                let _ = lri.get_or_default(&key, 0);
                let _ = lru.get_opt(&key);
            }
            4 => {
                assert_eq!(*lri.set_default(key, key), key);
                assert_eq!(*lru.set_default(key, key), key);
            }
            5 => {
                let _ = lri.pop(&key);
                let _ = lru.delete(&key);
            }
            6 => {
                let _ = lri.pop_item();
                let _ = lru.pop_oldest();
            }
            7 => {
                if key == 0 {
                    lri.clear();
                    lru.clear();
                }
            }
            _ => unreachable!(),
        }

        for cache_len in [lri.len(), lru.len()] {
            assert!(cache_len <= capacity);
        }
        for stats in [lri.stats(), lru.stats()] {
            assert!(stats.soft_miss_count <= stats.miss_count);
        }
        assert_eq!(lri.snapshot().len(), lri.len());
    }
});
