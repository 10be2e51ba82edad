//! First-fit allocation over a single fixed-capacity arena.
//!
//! A [`Pool`] reserves one contiguous region at creation and carves
//! variable-size records out of it on demand. Placement is first-fit in
//! address order; freeing a record removes it from the list, so its span
//! merges into the neighbouring free space without an explicit coalescing
//! step.
//!
//! # Architecture
//!
//! ```text
//! Pool (controller: counters, lifecycle, handle validation)
//! ├── Region (one Vec<u8>: pool header + data area, filled once)
//! ├── RecordList (address-ordered records in a generational SlotTable)
//! ├── placement (gap walk + first-fit search)
//! ├── header (binary pool/record headers mirrored into the region)
//! ├── layout (address-ordered report, fragmentation summary)
//! └── integrity (cross-checks table, counters and header bytes)
//! ```
//!
//! # Region layout
//!
//! ```text
//! [pool header][rec₀ header][rec₀ data][gap?][rec₁ header][rec₁ data]...[gap?]
//! ```
//!
//! Callers hold opaque [`RecordHandle`](fitpool_core::RecordHandle)s
//! rather than addresses. A handle from another pool, or to a record that
//! has been freed, is rejected with
//! [`PoolError::InvalidHandle`](fitpool_core::PoolError::InvalidHandle).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod header;
pub mod integrity;
pub mod layout;
pub mod placement;
pub mod pool;
pub mod record;
pub mod region;

// Public re-exports for the primary API surface.
pub use config::PoolConfig;
pub use integrity::IntegrityError;
pub use layout::{Fragmentation, GapState, Layout, LayoutEntry};
pub use pool::{DestroyReport, Pool};
