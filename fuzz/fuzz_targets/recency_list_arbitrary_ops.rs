#![no_main]

use arc_cache::ds::RecencyList;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on RecencyList
//
// Tests random sequences of add, get, peek, contains, remove, remove_oldest,
// evict_oldest, and clear to find edge cases and invariant violations.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize % 50).max(1);
    let mut list: RecencyList<u8, u32> = RecencyList::new(capacity).expect("positive capacity");

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1];
        let value = data[idx + 2] as u32;

        match op {
            0 | 1 => {
                list.add(key, value);
            }
            2 => {
                let _ = list.get(&key);
            }
            3 => {
                let _ = list.peek(&key);
            }
            4 => {
                let _ = list.contains(&key);
            }
            5 => {
                let _ = list.remove(&key);
            }
            6 => {
                let _ = list.remove_oldest();
            }
            _ => {
                if key == 0 {
                    list.clear();
                } else {
                    let _ = list.evict_oldest();
                }
            }
        }

        assert!(list.len() <= capacity);
        list.debug_validate_invariants();
        idx += 3;
    }
});
