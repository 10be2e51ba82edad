//! First-fit placement over the implicit free space.
//!
//! Gaps are not stored anywhere: they are recomputed on demand as the
//! complement of the record list against the data area. [`gaps`] walks them
//! in address order (front gap, inter-record gaps, tail gap) and
//! [`first_fit`] takes the first one that is large enough. Earliest
//! sufficient gap wins, not the tightest.

use crate::record::{Iter, RecordList};

/// One span of free bytes between records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gap {
    /// Offset of the first free byte.
    pub offset: usize,
    /// Length in bytes. May be zero between adjacent records.
    pub len: usize,
    /// Slot index of the record preceding the gap, `None` for the front gap.
    pub after: Option<u32>,
}

/// Address-ordered iterator over every gap of a record list.
pub struct Gaps<'a> {
    records: Iter<'a>,
    cursor: usize,
    after: Option<u32>,
    upper_bound: usize,
    done: bool,
}

/// Walk the gaps of `list` within `[data_start, upper_bound)`.
///
/// An empty list yields a single gap covering the whole data area.
pub fn gaps(list: &RecordList, data_start: usize, upper_bound: usize) -> Gaps<'_> {
    Gaps {
        records: list.iter(),
        cursor: data_start,
        after: None,
        upper_bound,
        done: false,
    }
}

impl Iterator for Gaps<'_> {
    type Item = Gap;

    fn next(&mut self) -> Option<Gap> {
        if self.done {
            return None;
        }
        let gap_start = self.cursor;
        let after = self.after;
        match self.records.next() {
            Some((key, record)) => {
                self.cursor = record.end();
                self.after = Some(key.index());
                Some(Gap {
                    offset: gap_start,
                    len: record.offset.saturating_sub(gap_start),
                    after,
                })
            }
            None => {
                self.done = true;
                Some(Gap {
                    offset: gap_start,
                    len: self.upper_bound.saturating_sub(gap_start),
                    after,
                })
            }
        }
    }
}

/// The first gap, in address order, holding at least `needed` bytes.
pub fn first_fit(
    list: &RecordList,
    data_start: usize,
    upper_bound: usize,
    needed: usize,
) -> Option<Gap> {
    gaps(list, data_start, upper_bound).find(|g| g.len >= needed)
}

/// Length of the largest gap (0 if the data area is fully covered).
pub fn largest_gap(list: &RecordList, data_start: usize, upper_bound: usize) -> usize {
    gaps(list, data_start, upper_bound)
        .map(|g| g.len)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitpool_core::RECORD_HEADER_SIZE;

    const START: usize = 32;
    const UPPER: usize = 256;

    #[test]
    fn empty_list_is_one_gap() {
        let list = RecordList::new();
        let all: Vec<_> = gaps(&list, START, UPPER).collect();
        assert_eq!(
            all,
            vec![Gap {
                offset: START,
                len: UPPER - START,
                after: None,
            }]
        );
        assert_eq!(first_fit(&list, START, UPPER, 40).unwrap().offset, START);
        assert!(first_fit(&list, START, UPPER, UPPER - START + 1).is_none());
    }

    #[test]
    fn gaps_cover_front_middle_and_tail() {
        let mut list = RecordList::new();
        // Record footprints: 24 + 8 = 32 bytes each.
        let a = list.insert_front(64, 8);
        let b = list.insert_after(a.index(), 128, 8).unwrap();
        let all: Vec<_> = gaps(&list, START, UPPER).collect();
        assert_eq!(
            all,
            vec![
                Gap {
                    offset: START,
                    len: 32,
                    after: None
                },
                Gap {
                    offset: 96,
                    len: 32,
                    after: Some(a.index())
                },
                Gap {
                    offset: 160,
                    len: 96,
                    after: Some(b.index())
                },
            ]
        );
    }

    #[test]
    fn earliest_sufficient_gap_wins() {
        let mut list = RecordList::new();
        let a = list.insert_front(64, 8);
        list.insert_after(a.index(), 128, 8).unwrap();
        // Both the front gap and the middle gap hold 32 bytes; front wins.
        let gap = first_fit(&list, START, UPPER, 32).unwrap();
        assert_eq!(gap.offset, START);
        assert_eq!(gap.after, None);
        // Too big for the first two gaps: lands in the tail.
        let gap = first_fit(&list, START, UPPER, 33).unwrap();
        assert_eq!(gap.offset, 160);
    }

    #[test]
    fn adjacent_records_yield_zero_length_gap() {
        let mut list = RecordList::new();
        let a = list.insert_front(START, 8);
        list.insert_after(a.index(), START + RECORD_HEADER_SIZE + 8, 8)
            .unwrap();
        let lens: Vec<_> = gaps(&list, START, UPPER).map(|g| g.len).collect();
        assert_eq!(lens, vec![0, 0, UPPER - START - 64]);
        assert_eq!(largest_gap(&list, START, UPPER), UPPER - START - 64);
    }

    #[test]
    fn full_data_area_has_no_room() {
        let mut list = RecordList::new();
        list.insert_front(START, UPPER - START - RECORD_HEADER_SIZE);
        assert_eq!(largest_gap(&list, START, UPPER), 0);
        assert!(first_fit(&list, START, UPPER, RECORD_HEADER_SIZE).is_none());
    }
}
