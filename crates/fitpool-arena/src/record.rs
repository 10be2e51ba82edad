//! Allocation records and the address-ordered record list.
//!
//! Records live in a [`SlotTable`] so callers can hold generation-checked
//! handles instead of raw addresses. The list order is carried by `prev` /
//! `next` slot-index links: walking from the head visits records in
//! strictly ascending offset order. There is no free list of spans; the
//! free space is whatever lies between consecutive records.

use fitpool_core::{footprint, SlotKey, SlotTable, RECORD_HEADER_SIZE};

/// Metadata for one live allocation.
///
/// The owning pool is implied by the table that holds the record; callers'
/// handles carry the pool id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Offset of the record header from the region base.
    pub offset: usize,
    /// Aligned data size (multiple of the alignment unit).
    pub size: usize,
    /// Cleared by the deallocator just before unlinking.
    pub in_use: bool,
    /// Slot index of the previous record in address order.
    pub prev: Option<u32>,
    /// Slot index of the next record in address order.
    pub next: Option<u32>,
}

impl Record {
    /// Offset of the first data byte (just past the header).
    pub fn data_offset(&self) -> usize {
        self.offset + RECORD_HEADER_SIZE
    }

    /// Header plus data bytes.
    pub fn footprint(&self) -> usize {
        footprint(self.size)
    }

    /// One past the record's last byte.
    pub fn end(&self) -> usize {
        self.offset + self.footprint()
    }
}

/// Address-ordered doubly-linked list of [`Record`]s.
#[derive(Debug, Default)]
pub struct RecordList {
    table: SlotTable<Record>,
    head: Option<u32>,
}

impl RecordList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            table: SlotTable::new(),
            head: None,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the list holds no records.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The record behind `key`, if `key` is current.
    pub fn get(&self, key: SlotKey) -> Option<&Record> {
        self.table.get(key)
    }

    /// Mutable access to the record behind `key`, if `key` is current.
    pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut Record> {
        self.table.get_mut(key)
    }

    /// Whether `key` was ever issued by this list's table.
    pub fn was_issued(&self, key: SlotKey) -> bool {
        self.table.was_issued(key)
    }

    /// Insert a new in-use record at the front of the list.
    ///
    /// The caller guarantees `offset + footprint` does not reach past the
    /// current head.
    pub fn insert_front(&mut self, offset: usize, size: usize) -> SlotKey {
        let old_head = self.head;
        let key = self.table.insert(Record {
            offset,
            size,
            in_use: true,
            prev: None,
            next: old_head,
        });
        if let Some(h) = old_head.and_then(|h| self.table.get_at_mut(h)) {
            h.prev = Some(key.index());
        }
        self.head = Some(key.index());
        key
    }

    /// Insert a new in-use record immediately after slot `prev`.
    ///
    /// The caller guarantees the new record fits in the gap between `prev`
    /// and its successor. Returns `None` if `prev` is not a live slot.
    pub fn insert_after(&mut self, prev: u32, offset: usize, size: usize) -> Option<SlotKey> {
        let next = self.table.get_at(prev)?.next;
        let key = self.table.insert(Record {
            offset,
            size,
            in_use: true,
            prev: Some(prev),
            next,
        });
        if let Some(p) = self.table.get_at_mut(prev) {
            p.next = Some(key.index());
        }
        if let Some(n) = next.and_then(|n| self.table.get_at_mut(n)) {
            n.prev = Some(key.index());
        }
        Some(key)
    }

    /// Remove the record behind `key`, splicing its neighbours together.
    ///
    /// Its span merges into the surrounding gap implicitly. Returns `None`
    /// if `key` is stale.
    pub fn unlink(&mut self, key: SlotKey) -> Option<Record> {
        let record = self.table.remove(key)?;
        match record.prev.and_then(|p| self.table.get_at_mut(p)) {
            Some(p) => p.next = record.next,
            None => self.head = record.next,
        }
        if let Some(n) = record.next.and_then(|n| self.table.get_at_mut(n)) {
            n.prev = record.prev;
        }
        Some(record)
    }

    /// Iterate over records in ascending address order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

/// Address-ordered iterator over a [`RecordList`].
pub struct Iter<'a> {
    list: &'a RecordList,
    cursor: Option<u32>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (SlotKey, &'a Record);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let record = self.list.table.get_at(index)?;
        let key = self.list.table.key_at(index)?;
        self.cursor = record.next;
        Some((key, record))
    }
}
