//! The reserved byte region backing a pool.
//!
//! A [`Region`] is one contiguous `Vec<u8>` reserved in a single allocation
//! at creation and released in one step when the pool is torn down. It never
//! grows. Offsets are measured from the region base; the pool header
//! occupies `[0, POOL_HEADER_SIZE)` and the data area runs from
//! [`Region::data_start`] to [`Region::upper_bound`].

use fitpool_core::POOL_HEADER_SIZE;

/// A fixed-size byte region with a pool-header prefix.
pub struct Region {
    /// Backing storage. Allocated to full capacity at creation.
    bytes: Vec<u8>,
}

impl Region {
    /// Reserve `capacity` bytes and fill the data area with `fill`.
    ///
    /// The pool-header prefix is zeroed; callers write the header
    /// afterwards. The fill happens once, here, and is never reapplied.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < POOL_HEADER_SIZE`. Pools validate capacity
    /// before reserving.
    pub fn new(capacity: usize, fill: u8) -> Self {
        assert!(
            capacity >= POOL_HEADER_SIZE,
            "region of {capacity} bytes cannot hold the pool header"
        );
        let mut bytes = vec![0u8; capacity];
        bytes[POOL_HEADER_SIZE..].fill(fill);
        Self { bytes }
    }

    /// Total bytes reserved.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Offset of the first byte after the pool header.
    pub fn data_start(&self) -> usize {
        POOL_HEADER_SIZE
    }

    /// One past the last usable offset.
    pub fn upper_bound(&self) -> usize {
        self.bytes.len()
    }

    /// Whether `[offset, offset + len)` lies inside the data area.
    pub fn contains_span(&self, offset: usize, len: usize) -> bool {
        offset >= self.data_start()
            && offset
                .checked_add(len)
                .is_some_and(|end| end <= self.upper_bound())
    }

    /// Shared view of `len` bytes at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the span exceeds the region.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    /// Mutable view of `len` bytes at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the span exceeds the region.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.bytes[offset..offset + len]
    }

    /// Overwrite `len` bytes at `offset` with `byte`.
    ///
    /// # Panics
    ///
    /// Panics if the span exceeds the region.
    pub fn fill(&mut self, offset: usize, len: usize, byte: u8) {
        self.slice_mut(offset, len).fill(byte);
    }

    /// The whole region, pool header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
