//! Benchmark profiles and utilities for the fitpool allocator.
//!
//! Provides pre-built pool profiles for benchmarking:
//!
//! - [`BenchProfile::reference`]: 64 KiB pool, requests up to 256 bytes
//! - [`BenchProfile::stress`]: 1 MiB pool, requests up to 1 KiB
//! - [`prefill`]: deterministic half-full pool via seed
//! - [`comb`]: a pool with `n` equal gaps ahead of its tail, for scan depth

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fitpool_arena::Pool;
use fitpool_core::{RecordHandle, POOL_HEADER_SIZE, RECORD_HEADER_SIZE};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Pool size and request distribution for a benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchProfile {
    pub capacity: usize,
    pub max_request: usize,
}

impl BenchProfile {
    /// 64 KiB pool with requests up to 256 bytes.
    pub fn reference() -> Self {
        Self {
            capacity: 64 * 1024,
            max_request: 256,
        }
    }

    /// 1 MiB pool with requests up to 1 KiB.
    pub fn stress() -> Self {
        Self {
            capacity: 1024 * 1024,
            max_request: 1024,
        }
    }
}

/// Fill a pool to roughly half its capacity, then free every other record.
///
/// Returns the pool and the surviving handles. Deterministic in `seed`.
pub fn prefill(profile: BenchProfile, seed: u64) -> (Pool, Vec<RecordHandle>) {
    let mut pool = Pool::create(profile.capacity).expect("profile capacity is valid");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut handles = Vec::new();
    while pool.stats().used < profile.capacity / 2 {
        match pool.allocate(rng.gen_range(0..=profile.max_request)) {
            Ok(h) => handles.push(h),
            Err(_) => break,
        }
    }
    let mut survivors = Vec::with_capacity(handles.len() / 2 + 1);
    for (i, h) in handles.into_iter().enumerate() {
        if i % 2 == 0 {
            pool.free(h).expect("prefill handle is live");
        } else {
            survivors.push(h);
        }
    }
    (pool, survivors)
}

/// A pool whose data area starts with `n` gaps of 32 bytes separated by
/// 32-byte records, followed by a tail large enough for a `tail` request.
///
/// Any request needing more than 32 bytes scans all `n` gaps before
/// landing in the tail.
pub fn comb(n: usize, tail: usize) -> Pool {
    let slot = 8 + RECORD_HEADER_SIZE;
    let tail_bytes = tail.next_multiple_of(8) + RECORD_HEADER_SIZE;
    let mut pool =
        Pool::create(POOL_HEADER_SIZE + 2 * n * slot + tail_bytes).expect("capacity is valid");
    let handles: Vec<_> = (0..2 * n)
        .map(|_| pool.allocate(8).expect("comb sized to fit"))
        .collect();
    for h in handles.into_iter().step_by(2) {
        pool.free(h).expect("comb handle is live");
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefill_is_deterministic() {
        let (a, ha) = prefill(BenchProfile::reference(), 42);
        let (b, hb) = prefill(BenchProfile::reference(), 42);
        assert_eq!(a.stats(), b.stats());
        assert_eq!(ha.len(), hb.len());
        assert_eq!(a.visualize(), b.visualize());
    }

    #[test]
    fn comb_forces_full_scan() {
        let mut pool = comb(10, 64);
        let frag = pool.fragmentation();
        assert_eq!(frag.gap_count, 11);
        assert_eq!(frag.largest_gap, 64 + RECORD_HEADER_SIZE);
        let h = pool.allocate(64).unwrap();
        let tail_start = POOL_HEADER_SIZE + 20 * (8 + RECORD_HEADER_SIZE);
        assert_eq!(pool.data_offset(h).unwrap(), tail_start + RECORD_HEADER_SIZE);
        pool.check_integrity().unwrap();
    }
}
