//! Address-ordered layout report: the fragmentation-visibility tool.
//!
//! A [`Layout`] is built by walking from the data-area start through the
//! record list, emitting a gap entry whenever the next record starts past
//! the cursor, then the record itself, and finally a trailing gap if the
//! cursor has not reached the upper bound. It always reconciles with the
//! pool's counters: the record footprints sum to `used`.

use std::fmt;

use fitpool_core::{PoolStats, RecordHandle};
use smallvec::SmallVec;

/// Fill state of a gap's bytes, judged against the pool's fill patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GapState {
    /// Every byte still holds the creation fill pattern.
    Pristine,
    /// Every byte holds the free-fill pattern.
    Released,
    /// Only creation-fill and free-fill bytes, interleaved.
    Mixed,
    /// Holds stale record bytes (nothing scrubbed them on free).
    Dirty,
}

impl GapState {
    /// Classify a gap's bytes.
    pub fn classify(bytes: &[u8], fill_pattern: u8, free_fill: Option<u8>) -> Self {
        if bytes.iter().all(|&b| b == fill_pattern) {
            return Self::Pristine;
        }
        let Some(free) = free_fill else {
            return Self::Dirty;
        };
        if bytes.iter().all(|&b| b == free) {
            Self::Released
        } else if bytes.iter().all(|&b| b == free || b == fill_pattern) {
            Self::Mixed
        } else {
            Self::Dirty
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pristine => "pristine",
            Self::Released => "released",
            Self::Mixed => "mixed",
            Self::Dirty => "dirty",
        }
    }
}

/// One entry of a [`Layout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutEntry {
    /// Free bytes between records (never zero-length).
    Gap {
        /// Offset of the first free byte.
        offset: usize,
        /// Length in bytes.
        len: usize,
        /// Fill state of the gap's bytes.
        state: GapState,
    },
    /// A record, header included.
    Record {
        /// Offset of the record header.
        offset: usize,
        /// Header plus aligned data bytes.
        footprint: usize,
        /// In-use flag (always set for records reachable from the list).
        in_use: bool,
        /// Handle naming the record.
        handle: RecordHandle,
    },
}

impl LayoutEntry {
    /// Offset of the entry's first byte.
    pub fn offset(&self) -> usize {
        match self {
            Self::Gap { offset, .. } | Self::Record { offset, .. } => *offset,
        }
    }

    /// Bytes covered by the entry.
    pub fn len(&self) -> usize {
        match self {
            Self::Gap { len, .. } => *len,
            Self::Record { footprint, .. } => *footprint,
        }
    }

    /// Whether the entry covers no bytes. Layout walks never emit one.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this entry is a gap.
    pub fn is_gap(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }
}

/// Fragmentation summary derived from a layout walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fragmentation {
    /// Sum of all gap lengths.
    pub free_bytes: usize,
    /// Longest single gap.
    pub largest_gap: usize,
    /// Number of gaps.
    pub gap_count: usize,
}

impl Fragmentation {
    /// `1 - largest_gap / free_bytes`: 0.0 when all free space is one
    /// contiguous gap (or there is none), approaching 1.0 as it splinters.
    pub fn ratio(&self) -> f64 {
        if self.free_bytes == 0 {
            return 0.0;
        }
        1.0 - self.largest_gap as f64 / self.free_bytes as f64
    }
}

/// Address-ordered diagnostic report of a pool.
///
/// `Display` renders the classic report; the alternate form (`{:#}`)
/// appends each gap's [`GapState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    stats: PoolStats,
    entries: SmallVec<[LayoutEntry; 16]>,
}

impl Layout {
    pub(crate) fn new(stats: PoolStats, entries: SmallVec<[LayoutEntry; 16]>) -> Self {
        Self { stats, entries }
    }

    /// Counters at the time of the walk.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Entries in ascending address order.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Sum of record footprints. Equals `stats().used`.
    pub fn record_bytes(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.is_gap())
            .map(LayoutEntry::len)
            .sum()
    }

    /// Sum of gap lengths.
    pub fn gap_bytes(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.is_gap())
            .map(LayoutEntry::len)
            .sum()
    }

    /// Gap entries only.
    pub fn gaps(&self) -> impl Iterator<Item = &LayoutEntry> {
        self.entries.iter().filter(|e| e.is_gap())
    }

    /// Summarise the gaps.
    pub fn fragmentation(&self) -> Fragmentation {
        self.gaps().fold(Fragmentation::default(), |acc, g| Fragmentation {
            free_bytes: acc.free_bytes + g.len(),
            largest_gap: acc.largest_gap.max(g.len()),
            gap_count: acc.gap_count + 1,
        })
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory Pool Visualization:")?;
        writeln!(f, "Total Size: {} bytes", self.stats.capacity)?;
        writeln!(f, "Used Memory: {} bytes", self.stats.used)?;
        writeln!(f, "Active Allocations: {}", self.stats.count)?;
        writeln!(f, "Memory Layout:")?;
        for entry in &self.entries {
            match entry {
                LayoutEntry::Gap { len, state, .. } => {
                    if f.alternate() {
                        writeln!(f, "[GAP: {len} bytes, {}]", state.label())?;
                    } else {
                        writeln!(f, "[GAP: {len} bytes]")?;
                    }
                }
                LayoutEntry::Record {
                    footprint, in_use, ..
                } => {
                    let tag = if *in_use { "USED" } else { "FREE" };
                    writeln!(f, "[{tag}: {footprint} bytes]")?;
                }
            }
        }
        Ok(())
    }
}
