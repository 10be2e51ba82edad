//! Deterministic allocate/free churn workloads.
//!
//! A churn run interleaves allocations of random sizes with frees of random
//! live records, driven by a seeded [`ChaCha8Rng`] so failures reproduce
//! exactly. Optionally checks every invariant after every step.

use fitpool_arena::Pool;
use fitpool_core::PoolError;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::{assert_invariants, LiveSet};

/// Parameters of a churn run.
#[derive(Clone, Debug)]
pub struct ChurnConfig {
    pub seed: u64,
    /// Total operations attempted.
    pub ops: usize,
    /// Requested sizes are drawn from `0..=max_size`.
    pub max_size: usize,
    /// Probability that a step frees instead of allocating (when anything
    /// is live).
    pub free_ratio: f64,
    /// Run [`assert_invariants`] after every step.
    pub check_each_step: bool,
}

impl ChurnConfig {
    pub fn new(seed: u64, ops: usize) -> Self {
        Self {
            seed,
            ops,
            max_size: 64,
            free_ratio: 0.4,
            check_each_step: true,
        }
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_free_ratio(mut self, free_ratio: f64) -> Self {
        self.free_ratio = free_ratio;
        self
    }

    pub fn unchecked(mut self) -> Self {
        self.check_each_step = false;
        self
    }
}

/// What a churn run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChurnReport {
    pub allocated: usize,
    pub freed: usize,
    pub out_of_budget: usize,
    pub no_fit: usize,
    /// Largest number of simultaneously live records.
    pub peak_live: usize,
}

/// Run a churn workload against `pool`, leaving survivors in `live`.
///
/// # Panics
///
/// Panics if the pool returns an error other than `OutOfBudget`/`NoFit`,
/// if a free of a live handle fails, or (when checking) if any invariant
/// breaks.
pub fn run_churn(pool: &mut Pool, config: &ChurnConfig, live: &mut LiveSet) -> ChurnReport {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut report = ChurnReport::default();

    for _ in 0..config.ops {
        if !live.is_empty() && rng.gen_bool(config.free_ratio) {
            if let Some((handle, _)) = live.take_random(&mut rng) {
                pool.free(handle).expect("live handle must free cleanly");
                report.freed += 1;
            }
        } else {
            let size = rng.gen_range(0..=config.max_size);
            match pool.allocate(size) {
                Ok(handle) => {
                    live.insert(handle, size);
                    report.allocated += 1;
                }
                Err(PoolError::OutOfBudget { .. }) => report.out_of_budget += 1,
                Err(PoolError::NoFit { .. }) => report.no_fit += 1,
                Err(e) => panic!("unexpected allocation error: {e}"),
            }
        }
        report.peak_live = report.peak_live.max(live.len());

        if config.check_each_step {
            assert_invariants(pool);
            assert_eq!(pool.stats().used, live.expected_used());
        }
    }
    report
}
