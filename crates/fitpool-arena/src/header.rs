//! Binary pool and record headers written into the region.
//!
//! All integers are little-endian. The record table is the source of truth;
//! headers mirror it in the arena bytes so a raw dump of the region shows the
//! same layout the table describes, and integrity checks can cross-verify
//! the two.

use fitpool_core::{SlotKey, POOL_HEADER_SIZE, RECORD_HEADER_SIZE};

use crate::region::Region;

/// Magic bytes at offset 0 of every region.
pub const POOL_MAGIC: [u8; 8] = *b"FITPOOL1";

/// Status byte of a record that is in use.
pub const STATUS_LIVE: u8 = 0xA5;

/// Status byte of a record that has been freed.
pub const STATUS_RELEASED: u8 = 0x5A;

const STATUS_AT: usize = 16;

/// Decoded pool header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolHeader {
    /// Total reserved bytes.
    pub capacity: u64,
    /// Bytes consumed by live records.
    pub used: u64,
    /// Number of live records.
    pub count: u64,
}

/// Decoded record header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    /// Aligned data size.
    pub size: u64,
    /// The record's slot key in the pool's table.
    pub key: SlotKey,
    /// Raw status byte ([`STATUS_LIVE`] or [`STATUS_RELEASED`]).
    pub status: u8,
}

impl RecordHeader {
    /// Whether the status byte marks the record as in use.
    pub fn is_live(&self) -> bool {
        self.status == STATUS_LIVE
    }
}

// ── Primitive writers / readers ─────────────────────────────────

fn put_u32_le(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_u64_le(buf: &mut [u8], at: usize, v: u64) {
    buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
}

fn get_u32_le(buf: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(b)
}

fn get_u64_le(buf: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(b)
}

// ── Pool header ─────────────────────────────────────────────────

/// Write the pool header at the region base.
pub fn write_pool(region: &mut Region, header: &PoolHeader) {
    let buf = region.slice_mut(0, POOL_HEADER_SIZE);
    buf[..8].copy_from_slice(&POOL_MAGIC);
    put_u64_le(buf, 8, header.capacity);
    put_u64_le(buf, 16, header.used);
    put_u64_le(buf, 24, header.count);
}

/// Read the pool header. Returns `None` if the magic bytes are wrong.
pub fn read_pool(region: &Region) -> Option<PoolHeader> {
    let buf = region.slice(0, POOL_HEADER_SIZE);
    if buf[..8] != POOL_MAGIC {
        return None;
    }
    Some(PoolHeader {
        capacity: get_u64_le(buf, 8),
        used: get_u64_le(buf, 16),
        count: get_u64_le(buf, 24),
    })
}

// ── Record header ───────────────────────────────────────────────

/// Write a record header at `offset`.
pub fn write_record(region: &mut Region, offset: usize, header: &RecordHeader) {
    let buf = region.slice_mut(offset, RECORD_HEADER_SIZE);
    put_u64_le(buf, 0, header.size);
    put_u32_le(buf, 8, header.key.index());
    put_u32_le(buf, 12, header.key.generation());
    buf[STATUS_AT] = header.status;
    buf[STATUS_AT + 1..].fill(0);
}

/// Read the record header at `offset`.
pub fn read_record(region: &Region, offset: usize) -> RecordHeader {
    let buf = region.slice(offset, RECORD_HEADER_SIZE);
    RecordHeader {
        size: get_u64_le(buf, 0),
        key: SlotKey::new(get_u32_le(buf, 8), get_u32_le(buf, 12)),
        status: buf[STATUS_AT],
    }
}

/// Flip the status byte of the record at `offset` to released.
pub fn mark_released(region: &mut Region, offset: usize) {
    region.slice_mut(offset + STATUS_AT, 1)[0] = STATUS_RELEASED;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_header_round_trip() {
        let mut region = Region::new(128, 0xCC);
        let header = PoolHeader {
            capacity: 128,
            used: 56,
            count: 2,
        };
        write_pool(&mut region, &header);
        assert_eq!(&region.as_bytes()[..8], b"FITPOOL1");
        assert_eq!(read_pool(&region), Some(header));
    }

    #[test]
    fn unwritten_pool_header_has_no_magic() {
        let region = Region::new(64, 0xCC);
        assert_eq!(read_pool(&region), None);
    }

    #[test]
    fn record_header_layout() {
        let mut region = Region::new(128, 0xCC);
        let header = RecordHeader {
            size: 16,
            key: SlotKey::new(3, 7),
            status: STATUS_LIVE,
        };
        write_record(&mut region, 40, &header);

        let raw = region.slice(40, RECORD_HEADER_SIZE);
        assert_eq!(&raw[..8], &16u64.to_le_bytes());
        assert_eq!(&raw[8..12], &3u32.to_le_bytes());
        assert_eq!(&raw[12..16], &7u32.to_le_bytes());
        assert_eq!(raw[16], STATUS_LIVE);
        assert_eq!(&raw[17..], &[0u8; 7]);
        // Bytes after the header keep the creation fill.
        assert_eq!(region.slice(40 + RECORD_HEADER_SIZE, 1), &[0xCC]);

        assert_eq!(read_record(&region, 40), header);
        assert!(read_record(&region, 40).is_live());
    }

    #[test]
    fn mark_released_flips_status_only() {
        let mut region = Region::new(128, 0xCC);
        let header = RecordHeader {
            size: 8,
            key: SlotKey::new(0, 0),
            status: STATUS_LIVE,
        };
        write_record(&mut region, 32, &header);
        mark_released(&mut region, 32);
        let read = read_record(&region, 32);
        assert_eq!(read.status, STATUS_RELEASED);
        assert!(!read.is_live());
        assert_eq!(read.size, 8);
    }
}
