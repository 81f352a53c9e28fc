// ==============================================
// CROSS-MODULE ARC PROPERTY TESTS (integration)
// ==============================================
//
// Behavioral properties of the ARC policy that span the recency-list layer
// and the policy layer. These exercise whole workloads rather than single
// operations and belong here rather than in any single source file.

use arc_cache::policy::arc::{ArcCore, ConcurrentArcCache};
use arc_cache::traits::{CoreCache, MutableCache, ReadOnlyCache};

/// Deterministic mixed workload driver (splitmix-style).
struct OpStream {
    state: u64,
}

impl OpStream {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }
}

// ==============================================
// Capacity Bound & Exclusivity
// ==============================================

#[test]
fn capacity_bound_holds_under_mixed_workload() {
    const CAPACITY: usize = 16;
    let mut cache: ArcCore<u64, u64> = ArcCore::new(CAPACITY).unwrap();
    let mut ops = OpStream::new(0x5eed);

    for step in 0..10_000u64 {
        let key = ops.next() % 64;
        match ops.next() % 10 {
            0..=4 => {
                cache.insert(key, step);
            }
            5..=7 => {
                let _ = cache.get(&key);
            }
            8 => {
                let _ = cache.peek(&key);
                let _ = cache.contains(&key);
            }
            _ => {
                cache.remove(&key);
            }
        }

        assert!(
            cache.len() <= CAPACITY,
            "live entries ({}) exceeded capacity ({}) after step {}",
            cache.len(),
            CAPACITY,
            step
        );
        cache
            .check_invariants()
            .unwrap_or_else(|err| panic!("invariant violated after step {}: {}", step, err));
    }
}

// ==============================================
// Ghost History Bound
// ==============================================
//
// A sequential scan of distinct keys is the workload that grows the tracked
// history fastest: T1 fills, then every insert demotes one key into B1.

#[test]
fn tracked_history_stays_within_twice_capacity_under_scan() {
    const CAPACITY: usize = 4;
    let mut cache: ArcCore<u64, u64> = ArcCore::new(CAPACITY).unwrap();

    for key in 0..32u64 {
        cache.insert(key, key);
        let tracked = cache.t1_len() + cache.t2_len() + cache.b1_len() + cache.b2_len();
        assert!(
            tracked <= 2 * CAPACITY,
            "tracked history ({}) exceeded 2x capacity after inserting {}",
            tracked,
            key
        );
        cache.check_invariants().unwrap();
    }

    // Reviving ghost keys swaps history for live entries; the bound holds.
    for key in 24..32u64 {
        cache.insert(key, key + 100);
        let tracked = cache.t1_len() + cache.t2_len() + cache.b1_len() + cache.b2_len();
        assert!(tracked <= 2 * CAPACITY);
        cache.check_invariants().unwrap();
    }
}

// ==============================================
// Ghost-Hit Adaptation Direction
// ==============================================

#[test]
fn reviving_a_recency_eviction_raises_the_target() {
    const CAPACITY: usize = 8;
    let mut cache: ArcCore<u64, &str> = ArcCore::new(CAPACITY).unwrap();

    for key in 0..=CAPACITY as u64 {
        cache.insert(key, "fill");
    }
    // Key 0 was the first in, so it is the one demoted to ghost history.
    assert!(!cache.contains(&0));
    assert_eq!(cache.b1_len(), 1);
    assert_eq!(cache.p_value(), 0);

    cache.insert(0, "revived");
    assert!(
        cache.p_value() > 0,
        "a ghost hit on the recency side must raise the T1 target"
    );
    assert_eq!(cache.get(&0), Some(&"revived"));
    cache.check_invariants().unwrap();
}

// ==============================================
// Purge
// ==============================================

#[test]
fn clear_forgets_every_key() {
    let mut cache: ArcCore<u64, u64> = ArcCore::new(8).unwrap();
    let mut ops = OpStream::new(42);

    for step in 0..200u64 {
        let key = ops.next() % 24;
        cache.insert(key, step);
        if step % 3 == 0 {
            let _ = cache.get(&key);
        }
    }

    let keys = cache.keys();
    assert!(!keys.is_empty());

    cache.clear();
    assert_eq!(cache.len(), 0);
    for key in keys {
        assert!(!cache.contains(&key));
        assert_eq!(cache.get(&key), None);
    }

    // Clearing an empty cache is a no-op.
    cache.clear();
    assert_eq!(cache.len(), 0);
    cache.check_invariants().unwrap();
}

// ==============================================
// Peek / Contains Non-Mutation
// ==============================================
//
// Two caches fed the same insert/get sequence must end in the same state
// even if one of them is additionally probed with peek/contains throughout.

#[test]
fn probing_does_not_change_eviction_decisions() {
    const CAPACITY: usize = 8;
    let mut quiet: ArcCore<u64, u64> = ArcCore::new(CAPACITY).unwrap();
    let mut probed: ArcCore<u64, u64> = ArcCore::new(CAPACITY).unwrap();
    let mut ops = OpStream::new(7);

    for step in 0..2_000u64 {
        let key = ops.next() % 32;
        let write = ops.next() % 2 == 0;

        if write {
            quiet.insert(key, step);
            probed.insert(key, step);
        } else {
            assert_eq!(quiet.get(&key), probed.get(&key));
        }

        // Probe only one of the two, repeatedly.
        let probe_key = ops.next() % 32;
        let _ = probed.peek(&probe_key);
        let _ = probed.contains(&probe_key);
        let _ = probed.peek(&probe_key);
    }

    assert_eq!(quiet.len(), probed.len());
    assert_eq!(quiet.keys(), probed.keys());
    assert_eq!(quiet.p_value(), probed.p_value());
    for key in 0..32u64 {
        assert_eq!(quiet.peek(&key), probed.peek(&key));
    }
}

// ==============================================
// Concurrent Wrapper
// ==============================================

#[test]
fn concurrent_cache_survives_contention() {
    const CAPACITY: usize = 32;
    let cache: ConcurrentArcCache<u64, u64> = ConcurrentArcCache::new(CAPACITY).unwrap();

    let mut workers = Vec::new();
    for t in 0..8u64 {
        let cache = cache.clone();
        workers.push(std::thread::spawn(move || {
            let mut ops = OpStream::new(t + 1);
            for step in 0..2_000u64 {
                let key = ops.next() % 64;
                match ops.next() % 4 {
                    0 | 1 => {
                        cache.insert(key, step);
                    }
                    2 => {
                        let _ = cache.get(&key);
                    }
                    _ => {
                        if ops.next() % 8 == 0 {
                            cache.remove(&key);
                        } else {
                            let _ = cache.peek(&key);
                        }
                    }
                }
            }
        }));
    }
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    assert!(cache.len() <= CAPACITY);
    for key in cache.keys() {
        assert!(cache.contains(&key));
    }
}
