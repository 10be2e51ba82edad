//! C FFI bindings for the fitpool arena allocator.
//!
//! Exposes a C-compatible API over [`fitpool_arena::Pool`]. Pools cross the
//! boundary as opaque `u64` handles and records as [`FitpoolRecord`] pairs
//! that name their issuing pool; every entry point
//! returns a [`FitpoolStatus`] code instead of aborting on misuse. This is
//! the only crate in the workspace that may contain `unsafe` code, confined
//! to writing through caller-provided out-pointers.
//!
//! Each pool sits behind its own mutex, so operations on one pool are
//! serialised while different pools proceed in parallel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a caught panic into
/// [`FitpoolStatus::Panicked`](crate::status::FitpoolStatus::Panicked).
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(_) => {
                tracing::error!("panic caught at the FFI boundary");
                $crate::status::FitpoolStatus::Panicked as i32
            }
        }
    };
}

/// Lock a mutex inside an [`ffi_guard!`] body, returning
/// [`FitpoolStatus::InternalError`](crate::status::FitpoolStatus::InternalError)
/// if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::FitpoolStatus::InternalError as i32,
        }
    };
}

pub mod pool;
pub mod status;

pub use pool::{
    fitpool_alloc, fitpool_create, fitpool_data, fitpool_destroy, fitpool_free, fitpool_stats,
    fitpool_visualize, FitpoolRecord, FitpoolStats, FITPOOL_NULL_RECORD,
};
pub use status::FitpoolStatus;
