//! The pool: one fixed-capacity region managed by a first-fit allocator.
//!
//! [`Pool`] owns the [`Region`] and the address-ordered [`RecordList`].
//! Every operation keeps three views in step: the record table (source of
//! truth), the aggregate counters, and the headers written into the region
//! bytes. [`Pool::check_integrity`] cross-verifies all three.

use std::fmt;

use fitpool_core::{
    align_up, HandleFault, PoolError, PoolId, PoolStats, RecordHandle, SlotKey, RECORD_HEADER_SIZE,
};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::config::PoolConfig;
use crate::header::{self, PoolHeader, RecordHeader, STATUS_LIVE};
use crate::integrity::{self, IntegrityError};
use crate::layout::{Fragmentation, GapState, Layout, LayoutEntry};
use crate::placement;
use crate::record::RecordList;
use crate::region::Region;

/// Outcome of tearing a pool down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestroyReport {
    /// Capacity of the released region.
    pub capacity: usize,
    /// Records still live at teardown.
    pub leaked: usize,
    /// Bytes those records consumed, headers included.
    pub leaked_bytes: usize,
}

impl DestroyReport {
    /// Whether every record had been freed before teardown.
    pub fn is_clean(&self) -> bool {
        self.leaked == 0
    }
}

/// A fixed-capacity arena with first-fit placement.
///
/// # Lifecycle
///
/// ```text
/// create ──► active (allocate / free, any order) ──► destroy | drop
/// ```
///
/// Destroying consumes the pool, so use after destroy is a compile error.
/// Dropping without [`destroy`](Pool::destroy) performs the same teardown,
/// including the leak warning.
pub struct Pool {
    /// Unique per-instance id, stamped into every issued handle.
    id: PoolId,
    /// Configuration the pool was created with.
    config: PoolConfig,
    /// Backing bytes: pool header then data area.
    region: Region,
    /// Live records in address order.
    records: RecordList,
    /// Bytes consumed by live records (data plus record headers).
    used: usize,
    /// Number of live records.
    count: usize,
    /// Set once teardown has run.
    torn_down: bool,
}

impl Pool {
    /// Create a pool of `capacity` bytes with default fill patterns.
    pub fn create(capacity: usize) -> Result<Self, PoolError> {
        Self::with_config(PoolConfig::new(capacity))
    }

    /// Create a pool from an explicit configuration.
    ///
    /// Reserves exactly `config.capacity` bytes in one allocation, writes
    /// the pool header and fills the data area with `config.fill_pattern`.
    pub fn with_config(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let region = Region::new(config.capacity, config.fill_pattern);
        let mut pool = Self {
            id: PoolId::next(),
            config,
            region,
            records: RecordList::new(),
            used: 0,
            count: 0,
            torn_down: false,
        };
        pool.sync_header();
        debug!(
            pool = %pool.id,
            capacity = pool.config.capacity,
            free_fill = ?pool.config.free_fill,
            "pool created"
        );
        Ok(pool)
    }

    /// This pool's unique id.
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Total reserved bytes, pool header included.
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    /// The configuration the pool was created with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Raw view of the whole region, headers included.
    pub fn bytes(&self) -> &[u8] {
        self.region.as_bytes()
    }

    // ── Allocation ──────────────────────────────────────────────

    /// Allocate `size` bytes, rounded up to the alignment unit.
    ///
    /// Rejects with [`PoolError::OutOfBudget`] when the record would not fit
    /// in `capacity - used` even ignoring fragmentation, and with
    /// [`PoolError::NoFit`] when the budget allows it but no single gap is
    /// large enough. Otherwise the record lands in the first sufficient gap
    /// in address order.
    ///
    /// A zero-size request succeeds and consumes only the record header.
    pub fn allocate(&mut self, size: usize) -> Result<RecordHandle, PoolError> {
        let available = self.capacity() - self.used;
        let Some((aligned, needed)) =
            align_up(size).and_then(|a| a.checked_add(RECORD_HEADER_SIZE).map(|n| (a, n)))
        else {
            debug!(pool = %self.id, size, available, "allocation overflows address space");
            return Err(PoolError::OutOfBudget {
                requested: usize::MAX,
                available,
            });
        };
        if needed > available {
            debug!(pool = %self.id, size, needed, available, "allocation out of budget");
            return Err(PoolError::OutOfBudget {
                requested: needed,
                available,
            });
        }

        let start = self.region.data_start();
        let upper = self.region.upper_bound();
        let Some(gap) = placement::first_fit(&self.records, start, upper, needed) else {
            let largest_gap = placement::largest_gap(&self.records, start, upper);
            debug!(pool = %self.id, size, needed, largest_gap, "no gap fits allocation");
            return Err(PoolError::NoFit {
                requested: needed,
                largest_gap,
            });
        };

        let key = match gap.after {
            None => self.records.insert_front(gap.offset, aligned),
            Some(prev) => self
                .records
                .insert_after(prev, gap.offset, aligned)
                .expect("gap anchor is a live record"),
        };
        header::write_record(
            &mut self.region,
            gap.offset,
            &RecordHeader {
                size: aligned as u64,
                key,
                status: STATUS_LIVE,
            },
        );
        self.used += needed;
        self.count += 1;
        self.sync_header();

        let handle = RecordHandle::new(self.id, key);
        trace!(
            pool = %self.id,
            record = %key,
            offset = gap.offset,
            size = aligned,
            "record placed"
        );
        Ok(handle)
    }

    /// Free the record behind `handle`. Passing `None` is a no-op.
    ///
    /// The record's span merges into the surrounding free space: there is
    /// no separate coalescing step. If the pool was configured with a free
    /// fill, the span is overwritten with it.
    ///
    /// Fails with [`PoolError::InvalidHandle`] for a handle from another
    /// pool, one already freed (double free), or one never issued.
    pub fn free(&mut self, handle: impl Into<Option<RecordHandle>>) -> Result<(), PoolError> {
        let Some(handle) = handle.into() else {
            return Ok(());
        };
        let key = self.resolve(handle)?;
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| invalid(handle, HandleFault::Released))?;
        if !record.in_use {
            return Err(invalid(handle, HandleFault::Released));
        }
        record.in_use = false;
        let offset = record.offset;
        let footprint = record.footprint();

        header::mark_released(&mut self.region, offset);
        self.records.unlink(key);
        self.used -= footprint;
        self.count -= 1;
        if let Some(byte) = self.config.free_fill {
            self.region.fill(offset, footprint, byte);
        }
        self.sync_header();

        trace!(pool = %self.id, record = %key, offset, footprint, "record released");
        Ok(())
    }

    // ── Data access ─────────────────────────────────────────────

    /// The data bytes of a live record (its aligned size, possibly empty).
    pub fn data(&self, handle: RecordHandle) -> Result<&[u8], PoolError> {
        let key = self.resolve(handle)?;
        let record = self.live(handle, key)?;
        Ok(self.region.slice(record.0, record.1))
    }

    /// Mutable data bytes of a live record.
    pub fn data_mut(&mut self, handle: RecordHandle) -> Result<&mut [u8], PoolError> {
        let key = self.resolve(handle)?;
        let (offset, size) = self.live(handle, key)?;
        Ok(self.region.slice_mut(offset, size))
    }

    /// Offset of a record's first data byte from the region base.
    ///
    /// Always a multiple of the alignment unit.
    pub fn data_offset(&self, handle: RecordHandle) -> Result<usize, PoolError> {
        let key = self.resolve(handle)?;
        Ok(self.live(handle, key)?.0)
    }

    /// Aligned data size of a live record.
    pub fn record_size(&self, handle: RecordHandle) -> Result<usize, PoolError> {
        let key = self.resolve(handle)?;
        Ok(self.live(handle, key)?.1)
    }

    /// Whether `handle` names a live record of this pool.
    pub fn contains(&self, handle: RecordHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Handles of every live record, in address order.
    pub fn handles(&self) -> impl Iterator<Item = RecordHandle> + '_ {
        self.records
            .iter()
            .map(move |(key, _)| RecordHandle::new(self.id, key))
    }

    // ── Introspection ───────────────────────────────────────────

    /// Aggregate counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            used: self.used,
            count: self.count,
        }
    }

    /// Walk the data area in address order, emitting gap and record entries.
    ///
    /// Record footprints in the result always sum to `stats().used`.
    pub fn layout(&self) -> Layout {
        let mut entries: SmallVec<[LayoutEntry; 16]> = SmallVec::new();
        let mut cursor = self.region.data_start();
        for (key, record) in self.records.iter() {
            if record.offset > cursor {
                entries.push(self.gap_entry(cursor, record.offset - cursor));
            }
            entries.push(LayoutEntry::Record {
                offset: record.offset,
                footprint: record.footprint(),
                in_use: record.in_use,
                handle: RecordHandle::new(self.id, key),
            });
            cursor = record.end();
        }
        let upper = self.region.upper_bound();
        if upper > cursor {
            entries.push(self.gap_entry(cursor, upper - cursor));
        }
        Layout::new(self.stats(), entries)
    }

    /// Render the layout report as text.
    pub fn visualize(&self) -> String {
        self.layout().to_string()
    }

    /// Summarise the free space without classifying gap bytes.
    pub fn fragmentation(&self) -> Fragmentation {
        placement::gaps(
            &self.records,
            self.region.data_start(),
            self.region.upper_bound(),
        )
        .filter(|g| g.len > 0)
        .fold(Fragmentation::default(), |acc, g| Fragmentation {
            free_bytes: acc.free_bytes + g.len,
            largest_gap: acc.largest_gap.max(g.len),
            gap_count: acc.gap_count + 1,
        })
    }

    /// Verify every structural invariant, including the header bytes.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        integrity::check(&self.records, &self.region, self.used, self.count)
    }

    // ── Teardown ────────────────────────────────────────────────

    /// Release the region, reporting any records still live.
    ///
    /// Outstanding records are not an error: they are counted, a warning is
    /// logged, and the region is released regardless.
    pub fn destroy(mut self) -> DestroyReport {
        self.teardown()
    }

    fn teardown(&mut self) -> DestroyReport {
        self.torn_down = true;
        let report = DestroyReport {
            capacity: self.capacity(),
            leaked: self.count,
            leaked_bytes: self.used,
        };
        if !report.is_clean() {
            warn!(
                pool = %self.id,
                leaked = report.leaked,
                leaked_bytes = report.leaked_bytes,
                "pool destroyed with live allocations"
            );
        }
        debug!(pool = %self.id, capacity = report.capacity, "pool destroyed");
        report
    }

    // ── Internals ───────────────────────────────────────────────

    /// Map a handle to a live slot key of this pool.
    fn resolve(&self, handle: RecordHandle) -> Result<SlotKey, PoolError> {
        if handle.pool() != self.id {
            return Err(invalid(handle, HandleFault::ForeignPool));
        }
        let key = handle.key();
        if self.records.get(key).is_some() {
            Ok(key)
        } else if self.records.was_issued(key) {
            Err(invalid(handle, HandleFault::Released))
        } else {
            Err(invalid(handle, HandleFault::NeverIssued))
        }
    }

    /// `(data_offset, size)` of a resolved, in-use record.
    fn live(&self, handle: RecordHandle, key: SlotKey) -> Result<(usize, usize), PoolError> {
        match self.records.get(key) {
            Some(r) if r.in_use => Ok((r.data_offset(), r.size)),
            _ => Err(invalid(handle, HandleFault::Released)),
        }
    }

    fn gap_entry(&self, offset: usize, len: usize) -> LayoutEntry {
        LayoutEntry::Gap {
            offset,
            len,
            state: GapState::classify(
                self.region.slice(offset, len),
                self.config.fill_pattern,
                self.config.free_fill,
            ),
        }
    }

    fn sync_header(&mut self) {
        let pool_header = PoolHeader {
            capacity: self.region.capacity() as u64,
            used: self.used as u64,
            count: self.count as u64,
        };
        header::write_pool(&mut self.region, &pool_header);
    }
}

fn invalid(handle: RecordHandle, fault: HandleFault) -> PoolError {
    PoolError::InvalidHandle { handle, fault }
}

impl Drop for Pool {
    fn drop(&mut self) {
        if !self.torn_down {
            self.teardown();
        }
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}
