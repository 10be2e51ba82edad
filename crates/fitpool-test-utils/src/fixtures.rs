//! Reusable pool fixtures.
//!
//! - [`reuse_scenario`]: the 150-byte pool after A, B, free(A), C.
//! - [`fragmented`]: alternating live records and 32-byte gaps.

use fitpool_arena::{Pool, PoolConfig};
use fitpool_core::{RecordHandle, POOL_HEADER_SIZE};

/// Handles produced by [`reuse_scenario`].
pub struct ReuseScenario {
    pub pool: Pool,
    /// Freed before `c` was allocated; stale.
    pub a: RecordHandle,
    pub b: RecordHandle,
    pub c: RecordHandle,
}

/// Build a 150-byte pool, allocate 12 (A) and 20 (B), free A, allocate 4 (C).
///
/// C reuses A's span. The pool ends with `used == 80`, `count == 2`.
pub fn reuse_scenario() -> ReuseScenario {
    reuse_scenario_with(PoolConfig::new(150))
}

/// [`reuse_scenario`] with a custom configuration (capacity must stay 150).
pub fn reuse_scenario_with(config: PoolConfig) -> ReuseScenario {
    let mut pool = Pool::with_config(config).expect("150-byte pool is valid");
    let a = pool.allocate(12).expect("A fits");
    let b = pool.allocate(20).expect("B fits");
    pool.free(a).expect("A is live");
    let c = pool.allocate(4).expect("C fits in A's span");
    ReuseScenario { pool, a, b, c }
}

/// A pool of `n` 8-byte records (32-byte footprint) with every other one
/// freed, leaving `n / 2` separate 32-byte gaps.
///
/// Returns the pool and the surviving handles in address order.
pub fn fragmented(n: usize) -> (Pool, Vec<RecordHandle>) {
    let mut pool = Pool::create(POOL_HEADER_SIZE + n * 32).expect("capacity is valid");
    let handles: Vec<_> = (0..n)
        .map(|_| pool.allocate(8).expect("pool sized to fit"))
        .collect();
    let mut survivors = Vec::with_capacity(n - n / 2);
    for (i, h) in handles.into_iter().enumerate() {
        if i % 2 == 0 {
            pool.free(h).expect("live handle");
        } else {
            survivors.push(h);
        }
    }
    (pool, survivors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuse_scenario_shape() {
        let s = reuse_scenario();
        assert_eq!(s.pool.stats().used, 80);
        assert!(!s.pool.contains(s.a));
        assert!(s.pool.contains(s.b));
        assert!(s.pool.contains(s.c));
    }

    #[test]
    fn fragmented_shape() {
        let (pool, survivors) = fragmented(8);
        assert_eq!(survivors.len(), 4);
        let frag = pool.fragmentation();
        assert_eq!(frag.gap_count, 4);
        assert_eq!(frag.largest_gap, 32);
        crate::assert_invariants(&pool);
    }
}
