//! Pool configuration parameters.

use fitpool_core::{PoolError, FILL_PATTERN, MIN_CAPACITY};

/// Configuration for a pool.
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Total bytes to reserve, pool header included.
    ///
    /// Must be at least [`MIN_CAPACITY`].
    pub capacity: usize,

    /// Byte written across the data area once, at creation.
    ///
    /// Default: `0xCC`. Never reapplied, so after a free/reuse cycle it only
    /// means "never touched since creation".
    pub fill_pattern: u8,

    /// Byte written over a record's whole span (header and data) when it is
    /// freed.
    ///
    /// Default: `None` (freed spans keep their stale contents). When set,
    /// the layout report can tell released gaps from pristine ones, so it
    /// must differ from [`fill_pattern`](Self::fill_pattern).
    pub free_fill: Option<u8>,
}

impl PoolConfig {
    /// Default capacity for [`PoolConfig::default`]: 4 KiB.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Default creation fill byte.
    pub const DEFAULT_FILL_PATTERN: u8 = FILL_PATTERN;

    /// Create a config for the given capacity with default fill behaviour.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            fill_pattern: Self::DEFAULT_FILL_PATTERN,
            free_fill: None,
        }
    }

    /// Use `byte` as the creation fill pattern.
    pub fn with_fill_pattern(mut self, byte: u8) -> Self {
        self.fill_pattern = byte;
        self
    }

    /// Scrub freed records with `byte`.
    pub fn with_free_fill(mut self, byte: u8) -> Self {
        self.free_fill = Some(byte);
        self
    }

    /// Check the capacity against [`MIN_CAPACITY`] and that the two fill
    /// bytes are distinct.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.capacity < MIN_CAPACITY {
            return Err(PoolError::CapacityTooSmall {
                requested: self.capacity,
                minimum: MIN_CAPACITY,
            });
        }
        if self.free_fill == Some(self.fill_pattern) {
            return Err(PoolError::FillCollision {
                byte: self.fill_pattern,
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
