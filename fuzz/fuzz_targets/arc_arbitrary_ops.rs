#![no_main]

use arc_cache::policy::arc::ArcCore;
use arc_cache::traits::{CoreCache, MutableCache, ReadOnlyCache};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on ArcCore
//
// Drives insert, get, peek, contains, remove, and clear with byte-derived
// keys, checking the cross-list invariants (capacity bound, exclusivity,
// ghost bounds, p range) after every operation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize % 32).max(1);
    let mut cache: ArcCore<u8, u32> = ArcCore::new(capacity).expect("positive capacity");

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1] % 64;
        let value = data[idx + 2] as u32;

        match op {
            0 | 1 | 2 => {
                cache.insert(key, value);
            }
            3 | 4 => {
                let _ = cache.get(&key);
            }
            5 => {
                let _ = cache.peek(&key);
                let _ = cache.contains(&key);
            }
            6 => {
                let _ = cache.remove(&key);
            }
            _ => {
                if key == 0 {
                    cache.clear();
                } else {
                    let _ = cache.keys();
                }
            }
        }

        assert!(cache.len() <= capacity);
        if let Err(err) = cache.check_invariants() {
            panic!("{err}");
        }
        idx += 3;
    }
});
