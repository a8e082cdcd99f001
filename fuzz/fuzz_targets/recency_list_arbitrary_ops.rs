#![no_main]

use libfuzzer_sys::fuzz_target;
use boundcache::ds::{RecencyList, SlotId};

// Fuzz arbitrary operation sequences on RecencyList
//
// Tests random sequences of push, move, remove, pop, rotate and clear against
// a Vec model of the oldest → newest order.
fuzz_target!(|data: &[u8]| {
    let mut list: RecencyList<u8, u32> = RecencyList::new();
    let mut model: Vec<(SlotId, u8)> = Vec::new();

    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 7;
        let arg = chunk[1];

        match op {
            0 => {
                // push_newest
                let id = list.push_newest(arg, u32::from(arg));
                model.push((id, arg));
            }
            1 => {
                // move_to_newest
                if !model.is_empty() {
                    let idx = arg as usize % model.len();
                    let entry = model.remove(idx);
                    assert!(list.move_to_newest(entry.0));
                    model.push(entry);
                }
            }
            2 => {
                // remove
                if !model.is_empty() {
                    let idx = arg as usize % model.len();
                    let (id, key) = model.remove(idx);
                    assert_eq!(list.remove(id).map(|(k, _)| k), Some(key));
                    assert!(!list.contains(id));
                }
            }
            3 => {
                // pop_oldest
                let expected = (!model.is_empty()).then(|| model.remove(0).1);
                assert_eq!(list.pop_oldest().map(|(k, _)| k), expected);
            }
            4 => {
                // pop_newest
                let expected = model.pop().map(|(_, k)| k);
                assert_eq!(list.pop_newest().map(|(k, _)| k), expected);
            }
            5 => {
                // rotate_anchor
                match list.rotate_anchor(arg, u32::from(arg)) {
                    Ok(((evicted, _), id)) => {
                        let (_, expected) = model.remove(0);
                        assert_eq!(evicted, expected);
                        model.push((id, arg));
                    }
                    Err((key, _)) => {
                        assert!(model.is_empty());
                        assert_eq!(key, arg);
                    }
                }
            }
            6 => {
                // clear (rarely)
                if arg == 0 {
                    list.clear();
                    model.clear();
                }
            }
            _ => unreachable!(),
        }

        assert_eq!(list.len(), model.len());
        let keys: Vec<u8> = list.iter().map(|(k, _)| *k).collect();
        let expected: Vec<u8> = model.iter().map(|(_, k)| *k).collect();
        assert_eq!(keys, expected);
        assert!(list.check_invariants().is_ok());
    }
});
