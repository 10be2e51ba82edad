//! Error taxonomy for pool operations.
//!
//! Creation and allocation failures are ordinary, recoverable signals.
//! Handle misuse (double free, foreign or never-issued handles) is a caller
//! bug, but it is still reported as a value: [`PoolError::class`] lets the
//! host decide whether to treat it as fatal.

use std::error::Error;
use std::fmt;

use crate::id::RecordHandle;

/// Errors that can occur during pool operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// Creation requested below the minimum viable size.
    CapacityTooSmall {
        /// Capacity the caller asked for.
        requested: usize,
        /// Smallest accepted capacity.
        minimum: usize,
    },
    /// The free-fill byte equals the creation fill pattern, so released
    /// gaps could not be told apart from untouched ones.
    FillCollision {
        /// The byte configured for both fills.
        byte: u8,
    },
    /// The request exceeds the pool's total free bytes.
    OutOfBudget {
        /// Bytes the record would consume, header included
        /// (`usize::MAX` if the aligned size overflowed).
        requested: usize,
        /// `capacity - used` at the time of the request.
        available: usize,
    },
    /// Enough free bytes exist in total, but no single gap is large enough.
    NoFit {
        /// Bytes the record would consume, header included.
        requested: usize,
        /// Largest contiguous gap currently available.
        largest_gap: usize,
    },
    /// The handle does not name a live record of this pool. Freeing a
    /// released record (double free) lands here with
    /// [`HandleFault::Released`].
    InvalidHandle {
        /// The rejected handle.
        handle: RecordHandle,
        /// Why the handle was rejected.
        fault: HandleFault,
    },
}

/// Why a [`RecordHandle`] was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleFault {
    /// Issued by a different pool.
    ForeignPool,
    /// Issued by this pool, but the record has since been freed.
    Released,
    /// Never issued by this pool.
    NeverIssued,
}

/// Recovery classification for a [`PoolError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The caller can retry: free something, request less, or pick a
    /// larger capacity.
    Recoverable,
    /// A logic error in the caller.
    Misuse,
}

impl PoolError {
    /// Classify this error for propagation decisions.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::CapacityTooSmall { .. }
            | Self::FillCollision { .. }
            | Self::OutOfBudget { .. }
            | Self::NoFit { .. } => ErrorClass::Recoverable,
            Self::InvalidHandle { .. } => ErrorClass::Misuse,
        }
    }

    /// Whether this is a double free or a use-after-free.
    pub fn is_use_after_free(&self) -> bool {
        matches!(
            self,
            Self::InvalidHandle {
                fault: HandleFault::Released,
                ..
            }
        )
    }
}

impl fmt::Display for HandleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignPool => write!(f, "issued by another pool"),
            Self::Released => write!(f, "record already freed"),
            Self::NeverIssued => write!(f, "never issued by this pool"),
        }
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityTooSmall { requested, minimum } => {
                write!(
                    f,
                    "capacity too small: requested {requested} bytes, minimum {minimum} bytes"
                )
            }
            Self::FillCollision { byte } => {
                write!(
                    f,
                    "free fill {byte:#04x} matches the creation fill pattern"
                )
            }
            Self::OutOfBudget {
                requested,
                available,
            } => {
                write!(
                    f,
                    "out of budget: requested {requested} bytes, available {available} bytes"
                )
            }
            Self::NoFit {
                requested,
                largest_gap,
            } => {
                write!(
                    f,
                    "no contiguous gap fits {requested} bytes (largest gap {largest_gap} bytes)"
                )
            }
            Self::InvalidHandle { handle, fault } => {
                write!(f, "invalid handle {handle}: {fault}")
            }
        }
    }
}

impl Error for PoolError {}
