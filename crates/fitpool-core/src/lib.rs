//! Core types for the fitpool fixed-capacity arena allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the allocation engine and its C ABI: arena geometry
//! constants, pool and record identifiers, the slot+generation table that
//! backs every handle, statistics, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod slots;
pub mod stats;

pub use error::{ErrorClass, HandleFault, PoolError};
pub use geometry::{
    align_up, footprint, ALIGNMENT, DEFAULT_FREE_FILL, FILL_PATTERN, MIN_CAPACITY,
    POOL_HEADER_SIZE, RECORD_HEADER_SIZE,
};
pub use id::{PoolId, RecordHandle};
pub use slots::{SlotKey, SlotTable};
pub use stats::PoolStats;
