//! Aggregate pool counters.

use std::fmt;

/// Snapshot of a pool's aggregate counters.
///
/// `used` includes per-record header overhead but not the pool header, so a
/// fresh pool reports `used == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PoolStats {
    /// Total reserved bytes, pool header included.
    pub capacity: usize,
    /// Bytes consumed by live records (data plus record headers).
    pub used: usize,
    /// Number of live records.
    pub count: usize,
}

impl PoolStats {
    /// `capacity - used`: the budget the allocator's quick-reject checks
    /// against. Ignores fragmentation and the pool header.
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.used)
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} bytes used by {} allocation(s)",
            self.used, self.capacity, self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_is_capacity_minus_used() {
        let stats = PoolStats {
            capacity: 150,
            used: 80,
            count: 2,
        };
        assert_eq!(stats.available(), 70);
        assert_eq!(stats.to_string(), "80 of 150 bytes used by 2 allocation(s)");
    }
}
