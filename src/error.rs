//! Error taxonomy for freezing lists and their iterators.

use std::thread::ThreadId;

use thiserror::Error;

/// Errors reported by [`FreezingList`](crate::FreezingList) and
/// [`ThreadConfinedIter`](crate::ThreadConfinedIter).
///
/// Everything except [`FreezeListError::FreezeConflict`] and
/// [`FreezeListError::FreezeInProgress`] indicates misuse and should be
/// treated as a programming error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FreezeListError {
    /// A mutation was attempted from a thread other than the owner.
    #[error("invalid owner thread: list is owned by {owner:?}, called from {caller:?}")]
    WrongOwner {
        /// Thread that constructed the list.
        owner: ThreadId,
        /// Thread that attempted the mutation.
        caller: ThreadId,
    },

    /// An iterator was used from a thread other than the one that created it.
    #[error("invalid current thread: iterator created on {creator:?}, used from {caller:?}")]
    WrongThread {
        /// Thread that created the iterator.
        creator: ThreadId,
        /// Thread that used it.
        caller: ThreadId,
    },

    /// A mutation was attempted after the list was frozen.
    #[error("list is frozen")]
    Frozen,

    /// Index outside `[0, size)`.
    #[error("index {index} out of range for size {size}")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Size of the list when the index was checked.
        size: usize,
    },

    /// The iterator has no more elements.
    #[error("iterator exhausted")]
    Exhausted,

    /// Freeze was attempted while the owner thread was inside a mutation.
    #[error("owner thread can still do mutations ({in_flight} in flight)")]
    FreezeConflict {
        /// Number of mutations observed in flight.
        in_flight: usize,
    },

    /// An owner mutation started while another thread was resolving a freeze.
    /// The freeze may still roll back, in which case a retry succeeds.
    #[error("list is being frozen by another thread")]
    FreezeInProgress,
}

impl FreezeListError {
    /// Whether retrying the failed operation can succeed.
    ///
    /// Only the two sides of a freeze race are transient: either the
    /// conflicting mutation or the competing freeze completes without
    /// waiting on anybody.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FreezeListError::FreezeConflict { .. } | FreezeListError::FreezeInProgress
        )
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FreezeListError>;
