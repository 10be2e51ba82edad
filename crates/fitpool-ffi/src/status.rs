//! C-compatible status codes.
//!
//! [`FitpoolStatus`] is a `repr(i32)` enum covering every error condition
//! the pool can report, plus the boundary-only conditions (bad arguments,
//! short buffers, poisoned locks, caught panics).

use fitpool_core::{HandleFault, PoolError};

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitpoolStatus {
    /// Success.
    Ok = 0,
    /// Pool handle is invalid or was already destroyed.
    InvalidPool = -1,
    /// Record handle was never issued by this pool.
    InvalidRecord = -2,
    /// Record handle names a record that has already been freed.
    UseAfterFree = -3,
    /// Capacity below the minimum viable pool size.
    CapacityTooSmall = -4,
    /// Request exceeds the pool's remaining budget.
    OutOfBudget = -5,
    /// Budget allows the request but no single gap is large enough.
    NoFit = -6,
    /// An argument is null, out of range, or otherwise invalid.
    InvalidArgument = -7,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -8,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -9,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&PoolError> for FitpoolStatus {
    fn from(e: &PoolError) -> Self {
        match e {
            PoolError::CapacityTooSmall { .. } => FitpoolStatus::CapacityTooSmall,
            PoolError::FillCollision { .. } => FitpoolStatus::InvalidArgument,
            PoolError::OutOfBudget { .. } => FitpoolStatus::OutOfBudget,
            PoolError::NoFit { .. } => FitpoolStatus::NoFit,
            PoolError::InvalidHandle { fault, .. } => match fault {
                HandleFault::Released => FitpoolStatus::UseAfterFree,
                HandleFault::ForeignPool | HandleFault::NeverIssued => {
                    FitpoolStatus::InvalidRecord
                }
            },
        }
    }
}
