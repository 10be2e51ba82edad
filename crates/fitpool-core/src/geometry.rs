//! Arena geometry: alignment, header sizes, and fill patterns.
//!
//! The in-memory shape of every arena is
//!
//! ```text
//! [Pool Header][Record₀ Header][Record₀ Data][gap?][Record₁ Header][Record₁ Data]...[gap?]
//! ^ base       ^ base + POOL_HEADER_SIZE                                    upper bound ^
//! ```
//!
//! Both header sizes are multiples of [`ALIGNMENT`] and every record's data
//! size is rounded up to [`ALIGNMENT`], so every data offset measured from
//! the arena base is itself a multiple of [`ALIGNMENT`].

/// Byte multiple to which every allocation size is rounded up.
pub const ALIGNMENT: usize = 8;

/// Size of the pool header written at the start of the arena.
///
/// Layout: magic `b"FITPOOL1"`, then capacity, used and count as
/// little-endian `u64`s.
pub const POOL_HEADER_SIZE: usize = 32;

/// Size of the header written in front of every record's data.
///
/// Layout: aligned size (`u64` LE), slot index (`u32` LE), generation
/// (`u32` LE), status byte, 7 reserved zero bytes.
pub const RECORD_HEADER_SIZE: usize = 24;

/// Smallest capacity that leaves room for one minimal record.
pub const MIN_CAPACITY: usize = POOL_HEADER_SIZE + RECORD_HEADER_SIZE + ALIGNMENT;

/// Debug byte written across the data area once, at creation.
pub const FILL_PATTERN: u8 = 0xCC;

/// Suggested byte for scrubbing released records when free-fill is enabled.
pub const DEFAULT_FREE_FILL: u8 = 0xDD;

const _: () = assert!(ALIGNMENT.is_power_of_two());
const _: () = assert!(POOL_HEADER_SIZE % ALIGNMENT == 0);
const _: () = assert!(RECORD_HEADER_SIZE % ALIGNMENT == 0);

/// Round `size` up to the nearest multiple of [`ALIGNMENT`].
///
/// Returns `None` if the rounded value does not fit in `usize`.
/// A zero-byte request maps to zero.
pub const fn align_up(size: usize) -> Option<usize> {
    match size.checked_add(ALIGNMENT - 1) {
        Some(v) => Some(v & !(ALIGNMENT - 1)),
        None => None,
    }
}

/// Total arena bytes consumed by a record with the given aligned size.
pub const fn footprint(aligned_size: usize) -> usize {
    aligned_size + RECORD_HEADER_SIZE
}
