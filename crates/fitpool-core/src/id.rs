//! Pool identifiers and the opaque record handle.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::slots::SlotKey;

/// Counter for unique [`PoolId`] allocation.
static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a pool.
///
/// Allocated from a monotonic atomic counter via [`PoolId::next`]. Two pools
/// never share an id within a process, even if one was destroyed and the
/// next reuses its memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u64);

impl PoolId {
    /// Allocate a fresh, unique pool id. Thread-safe.
    pub fn next() -> Self {
        Self(POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Rebuild an id from a value returned by [`get`](Self::get).
    ///
    /// Used where handles cross a boundary as plain integers. A value never
    /// handed out by [`next`](Self::next) (including 0) names no pool, so
    /// handles carrying it are rejected as foreign.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to one live allocation.
///
/// Returned by `Pool::allocate` in place of a raw data pointer. A handle
/// names its owning pool and the record's slot occupancy, so handles from
/// another pool and handles to released records are detected instead of
/// dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct RecordHandle {
    pool: PoolId,
    key: SlotKey,
}

impl RecordHandle {
    /// Assemble a handle. Only pools mint meaningful handles; anything else
    /// is rejected on use.
    pub fn new(pool: PoolId, key: SlotKey) -> Self {
        Self { pool, key }
    }

    /// The pool that issued this handle.
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// The record's slot key within its pool.
    pub fn key(&self) -> SlotKey {
        self.key
    }
}

impl fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecordHandle(pool={}, slot={}, gen={})",
            self.pool,
            self.key.index(),
            self.key.generation()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_ids_are_unique() {
        let a = PoolId::next();
        let b = PoolId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
        assert_eq!(PoolId::from_raw(a.get()), a);
        assert_ne!(PoolId::from_raw(0), a);
    }

    #[test]
    fn handle_accessors() {
        let pool = PoolId::next();
        let h = RecordHandle::new(pool, SlotKey::new(4, 2));
        assert_eq!(h.pool(), pool);
        assert_eq!(h.key(), SlotKey::new(4, 2));
        assert!(h.to_string().contains("slot=4, gen=2"));
    }
}
