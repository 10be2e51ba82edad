//! Structural invariant checks for a pool.
//!
//! Verifies that the record list is strictly address-ordered and
//! non-overlapping, that every record lies inside the data area with an
//! aligned size, that the aggregate counters match the list, and that the
//! headers written into the region agree with the record table.

use std::error::Error;
use std::fmt;

use fitpool_core::ALIGNMENT;

use crate::header;
use crate::record::RecordList;
use crate::region::Region;

/// A violated pool invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegrityError {
    /// A record starts before the previous one ends.
    Overlap {
        /// Offset of the offending record.
        offset: usize,
        /// End of the preceding record (or the data-area start).
        previous_end: usize,
    },
    /// A record extends past the upper bound.
    OutOfBounds {
        /// Offset of the offending record.
        offset: usize,
        /// End of the record.
        end: usize,
        /// Upper bound of the region.
        upper_bound: usize,
    },
    /// A record's offset or size is not a multiple of the alignment unit.
    Misaligned {
        /// Offset of the offending record.
        offset: usize,
    },
    /// A `prev` link does not point back at the preceding record, or the
    /// list is longer than the table (a cycle).
    BrokenLink {
        /// Slot index of the offending record.
        index: u32,
    },
    /// A record reachable from the list is not marked in use.
    NotInUse {
        /// Offset of the offending record.
        offset: usize,
    },
    /// The live record count disagrees with the list.
    CountMismatch {
        /// Records reachable from the head.
        walked: usize,
        /// Live slots in the table.
        table: usize,
        /// The pool's `count` counter.
        recorded: usize,
    },
    /// `used` disagrees with the sum of record footprints.
    UsedMismatch {
        /// Sum of footprints over the list.
        summed: usize,
        /// The pool's `used` counter.
        recorded: usize,
    },
    /// A record header in the region disagrees with the table.
    HeaderMismatch {
        /// Offset of the offending record.
        offset: usize,
    },
    /// The pool header is missing or stale.
    PoolHeaderMismatch,
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap {
                offset,
                previous_end,
            } => write!(
                f,
                "record at {offset} overlaps preceding span ending at {previous_end}"
            ),
            Self::OutOfBounds {
                offset,
                end,
                upper_bound,
            } => write!(
                f,
                "record at {offset} ends at {end}, past upper bound {upper_bound}"
            ),
            Self::Misaligned { offset } => write!(f, "record at {offset} is misaligned"),
            Self::BrokenLink { index } => write!(f, "broken list link at slot {index}"),
            Self::NotInUse { offset } => {
                write!(f, "listed record at {offset} is not marked in use")
            }
            Self::CountMismatch {
                walked,
                table,
                recorded,
            } => write!(
                f,
                "count mismatch: {walked} listed, {table} in table, {recorded} recorded"
            ),
            Self::UsedMismatch { summed, recorded } => {
                write!(f, "used mismatch: {summed} summed, {recorded} recorded")
            }
            Self::HeaderMismatch { offset } => {
                write!(f, "record header at {offset} disagrees with the table")
            }
            Self::PoolHeaderMismatch => write!(f, "pool header is missing or stale"),
        }
    }
}

impl Error for IntegrityError {}

/// Check every structural invariant of a pool's state.
pub(crate) fn check(
    records: &RecordList,
    region: &Region,
    used: usize,
    count: usize,
) -> Result<(), IntegrityError> {
    let upper_bound = region.upper_bound();
    let mut cursor = region.data_start();
    let mut prev: Option<u32> = None;
    let mut walked = 0usize;
    let mut summed = 0usize;

    for (key, record) in records.iter() {
        walked += 1;
        if walked > records.len() || record.prev != prev {
            return Err(IntegrityError::BrokenLink { index: key.index() });
        }
        if record.offset < cursor {
            return Err(IntegrityError::Overlap {
                offset: record.offset,
                previous_end: cursor,
            });
        }
        if record.offset % ALIGNMENT != 0 || record.size % ALIGNMENT != 0 {
            return Err(IntegrityError::Misaligned {
                offset: record.offset,
            });
        }
        if !region.contains_span(record.offset, record.footprint()) {
            return Err(IntegrityError::OutOfBounds {
                offset: record.offset,
                end: record.offset.saturating_add(record.footprint()),
                upper_bound,
            });
        }
        if !record.in_use {
            return Err(IntegrityError::NotInUse {
                offset: record.offset,
            });
        }
        let on_disk = header::read_record(region, record.offset);
        if on_disk.size != record.size as u64 || on_disk.key != key || !on_disk.is_live() {
            return Err(IntegrityError::HeaderMismatch {
                offset: record.offset,
            });
        }
        cursor = record.end();
        prev = Some(key.index());
        summed += record.footprint();
    }

    if walked != records.len() || walked != count {
        return Err(IntegrityError::CountMismatch {
            walked,
            table: records.len(),
            recorded: count,
        });
    }
    if summed != used {
        return Err(IntegrityError::UsedMismatch {
            summed,
            recorded: used,
        });
    }

    let expected = header::PoolHeader {
        capacity: region.capacity() as u64,
        used: used as u64,
        count: count as u64,
    };
    if header::read_pool(region) != Some(expected) {
        return Err(IntegrityError::PoolHeaderMismatch);
    }
    Ok(())
}
