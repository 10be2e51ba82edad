//! Fitpool: a fixed-capacity first-fit arena allocator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the fitpool sub-crates. For most users, adding `fitpool` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use fitpool::prelude::*;
//!
//! let mut pool = Pool::create(150).unwrap();
//! let a = pool.allocate(12).unwrap();
//! pool.data_mut(a).unwrap()[..11].copy_from_slice(b"Hello World");
//! let b = pool.allocate(20).unwrap();
//!
//! pool.free(a).unwrap();
//! // The 4-byte request reuses the span `a` left behind.
//! let c = pool.allocate(4).unwrap();
//!
//! let stats = pool.stats();
//! assert_eq!((stats.capacity, stats.used, stats.count), (150, 80, 2));
//!
//! // Stale handles are rejected, not dereferenced.
//! assert!(pool.free(a).unwrap_err().is_use_after_free());
//!
//! println!("{}", pool.visualize());
//! # let _ = (b, c);
//! let report = pool.destroy();
//! assert_eq!(report.leaked, 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `fitpool-arena` | `Pool`, configuration, layout reports, integrity checks |
//! | [`types`] | `fitpool-core` | Handles, ids, errors, stats, geometry constants |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The allocation engine (`fitpool-arena`).
///
/// [`arena::Pool`] is the main type; [`arena::Layout`] is the
/// address-ordered diagnostic report.
pub use fitpool_arena as arena;

/// Core types, errors, and geometry (`fitpool-core`).
///
/// Contains [`types::RecordHandle`], [`types::PoolError`],
/// [`types::PoolStats`] and the alignment/header constants.
pub use fitpool_core as types;

/// Common imports for typical fitpool usage.
///
/// ```rust
/// use fitpool::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use fitpool_arena::{DestroyReport, Pool, PoolConfig};

    // Diagnostics
    pub use fitpool_arena::{Fragmentation, GapState, IntegrityError, Layout, LayoutEntry};

    // Core types
    pub use fitpool_core::{PoolId, PoolStats, RecordHandle};

    // Errors
    pub use fitpool_core::{ErrorClass, HandleFault, PoolError};
}
