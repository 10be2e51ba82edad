//! Test utilities for fitpool development.
//!
//! Provides [`assert_invariants`] (a panicking wrapper around the pool's
//! integrity check plus layout reconciliation), [`LiveSet`] bookkeeping for
//! tests that juggle many handles, and deterministic churn workloads in
//! [`churn`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod churn;
pub mod fixtures;

use fitpool_arena::Pool;
use fitpool_core::{RecordHandle, RECORD_HEADER_SIZE};
use indexmap::IndexMap;
use rand::Rng;

pub use churn::{run_churn, ChurnConfig, ChurnReport};

/// Panic with a descriptive message if any pool invariant is violated.
///
/// Checks the structural invariants, then reconciles the layout walk
/// against the counters: record footprints sum to `used`, entries are
/// contiguous, and together they cover the whole data area.
pub fn assert_invariants(pool: &Pool) {
    if let Err(e) = pool.check_integrity() {
        panic!("pool integrity violated: {e}\n{}", pool.visualize());
    }
    let layout = pool.layout();
    let stats = pool.stats();
    assert_eq!(
        layout.record_bytes(),
        stats.used,
        "layout does not reconcile with stats"
    );
    assert_eq!(
        layout.entries().iter().filter(|e| !e.is_gap()).count(),
        stats.count
    );

    let mut cursor = fitpool_core::POOL_HEADER_SIZE;
    for entry in layout.entries() {
        assert_eq!(entry.offset(), cursor, "layout entries are not contiguous");
        assert!(!entry.is_empty(), "layout emitted an empty entry");
        cursor += entry.len();
    }
    assert_eq!(cursor, stats.capacity, "layout does not reach the upper bound");
}

/// Live handles keyed for O(1) random removal.
///
/// Values are the requested (unaligned) sizes so tests can recompute the
/// expected `used` independently of the pool.
#[derive(Debug, Default)]
pub struct LiveSet {
    handles: IndexMap<RecordHandle, usize>,
}

impl LiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: RecordHandle, requested: usize) {
        self.handles.insert(handle, requested);
    }

    /// Remove and return a uniformly chosen handle.
    pub fn take_random<R: Rng>(&mut self, rng: &mut R) -> Option<(RecordHandle, usize)> {
        if self.handles.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.handles.len());
        self.handles.swap_remove_index(i)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// `used` as the pool should report it for this live set.
    pub fn expected_used(&self) -> usize {
        self.handles
            .values()
            .map(|&size| {
                fitpool_core::align_up(size).expect("test sizes are small") + RECORD_HEADER_SIZE
            })
            .sum()
    }

    /// Free every handle, asserting each free succeeds.
    pub fn drain_into(&mut self, pool: &mut Pool) {
        for (handle, _) in self.handles.drain(..) {
            pool.free(handle).expect("live handle must free cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn live_set_tracks_expected_used() {
        let mut pool = Pool::create(512).unwrap();
        let mut live = LiveSet::new();
        for size in [0, 1, 9, 16] {
            live.insert(pool.allocate(size).unwrap(), size);
        }
        assert_eq!(live.expected_used(), pool.stats().used);
        assert_invariants(&pool);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (h, _) = live.take_random(&mut rng).unwrap();
        pool.free(h).unwrap();
        assert_eq!(live.expected_used(), pool.stats().used);

        live.drain_into(&mut pool);
        assert!(live.is_empty());
        assert_eq!(pool.stats().count, 0);
        assert_invariants(&pool);
    }

    #[test]
    fn take_random_on_empty_is_none() {
        let mut live = LiveSet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(live.take_random(&mut rng).is_none());
    }
}
