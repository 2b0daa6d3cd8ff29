//! Liveness flag and the freeze transition.
//!
//! The flag moves `Alive -> Frozen` exactly once. Owner mutations register
//! themselves in an in-flight counter before looking at the flag, and the
//! freezer publishes a transient `FREEZING` state before looking at the
//! counter. Both sides use sequentially consistent operations, so at least
//! one of them observes the other:
//!
//! - the freezer sees a non-zero counter and rolls back to `Alive`, or
//! - the owner sees `FREEZING`/`FROZEN` and backs out of its mutation.
//!
//! Neither side waits on the other. An owner write that lands while a freeze
//! is resolving fails with a retryable rejection, even if that freeze later
//! rolls back.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::sync::mutex::FreezeLock;

const ALIVE: u8 = 0;
const FREEZING: u8 = 1;
const FROZEN: u8 = 2;

/// Observable liveness of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Liveness {
    /// Owned; only the owner thread reads and writes.
    Alive,
    /// Permanently immutable; any thread may read.
    Frozen,
}

/// Outcome of a successful freeze call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FreezeOutcome {
    /// This call performed the transition.
    Transitioned,
    /// The list was already frozen.
    AlreadyFrozen,
}

/// Why the owner could not start a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MutationRejected {
    /// A freeze is being resolved on another thread.
    Freezing,
    /// The list is frozen for good.
    Frozen,
}

/// Two-state flag plus the in-flight mutation counter it is checked against.
#[derive(Debug)]
pub(crate) struct LivenessFlag {
    state: AtomicU8,
    in_flight: AtomicUsize,
    /// Serializes freezers; never taken by readers or the owner's writes.
    freeze_lock: FreezeLock,
}

impl LivenessFlag {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ALIVE),
            in_flight: AtomicUsize::new(0),
            freeze_lock: FreezeLock::new(),
        }
    }

    /// Fast-path check. A `FREEZING` list still counts as alive.
    ///
    /// Acquire pairs with the release store of `FROZEN`, so a `false` result
    /// makes every owner write visible to the caller.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state.load(Ordering::Acquire) != FROZEN
    }

    pub fn liveness(&self) -> Liveness {
        if self.is_alive() {
            Liveness::Alive
        } else {
            Liveness::Frozen
        }
    }

    /// Attempt the `Alive -> Frozen` transition.
    ///
    /// Returns the observed in-flight count on conflict. The list is left
    /// `Alive` in that case.
    pub fn freeze(&self) -> Result<FreezeOutcome, usize> {
        let _turn = self.freeze_lock.acquire();

        // Under the guard the state is either ALIVE or FROZEN.
        if self
            .state
            .compare_exchange(ALIVE, FREEZING, Ordering::SeqCst, Ordering::Acquire)
            .is_err()
        {
            return Ok(FreezeOutcome::AlreadyFrozen);
        }

        // Reading zero synchronizes with the last mutation's release decrement.
        let in_flight = self.in_flight.load(Ordering::SeqCst);
        if in_flight != 0 {
            self.state.store(ALIVE, Ordering::SeqCst);
            return Err(in_flight);
        }

        self.state.store(FROZEN, Ordering::SeqCst);
        Ok(FreezeOutcome::Transitioned)
    }

    /// Mark the start of an owner mutation.
    ///
    /// Fails fast when a freeze is resolving or done; the in-flight mark is
    /// released before returning. Must only be called from the owner thread.
    pub fn enter_mutation(&self) -> Result<MutationGuard<'_>, MutationRejected> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = MutationGuard {
            in_flight: &self.in_flight,
        };

        match self.state.load(Ordering::SeqCst) {
            ALIVE => Ok(guard),
            FREEZING => Err(MutationRejected::Freezing),
            _ => Err(MutationRejected::Frozen),
        }
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Marks an owner mutation as in flight until dropped.
#[derive(Debug)]
pub(crate) struct MutationGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flag_is_alive() {
        let flag = LivenessFlag::new();
        assert!(flag.is_alive());
        assert_eq!(flag.liveness(), Liveness::Alive);
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let flag = LivenessFlag::new();
        assert_eq!(flag.freeze(), Ok(FreezeOutcome::Transitioned));
        assert_eq!(flag.freeze(), Ok(FreezeOutcome::AlreadyFrozen));
        assert_eq!(flag.liveness(), Liveness::Frozen);
    }

    #[test]
    fn test_freeze_conflicts_with_in_flight_mutation() {
        let flag = LivenessFlag::new();
        let guard = flag.enter_mutation().expect("alive flag admits mutation");

        assert_eq!(flag.freeze(), Err(1));
        assert!(flag.is_alive());

        drop(guard);
        assert_eq!(flag.in_flight(), 0);
        assert_eq!(flag.freeze(), Ok(FreezeOutcome::Transitioned));
    }

    #[test]
    fn test_mutation_rejected_after_freeze() {
        let flag = LivenessFlag::new();
        flag.freeze().unwrap();

        assert_eq!(flag.enter_mutation().err(), Some(MutationRejected::Frozen));
        assert_eq!(flag.in_flight(), 0);
    }

    #[test]
    fn test_mutation_backs_out_while_freezing() {
        let flag = LivenessFlag::new();
        flag.state.store(FREEZING, Ordering::SeqCst);

        assert_eq!(flag.enter_mutation().err(), Some(MutationRejected::Freezing));
        assert_eq!(flag.in_flight(), 0);

        flag.state.store(ALIVE, Ordering::SeqCst);
        assert!(flag.enter_mutation().is_ok());
    }

    #[test]
    fn test_concurrent_freezers_transition_once() {
        let flag = LivenessFlag::new();
        let transitions = std::sync::atomic::AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    if flag.freeze() == Ok(FreezeOutcome::Transitioned) {
                        transitions.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(transitions.load(Ordering::SeqCst), 1);
        assert!(!flag.is_alive());
    }
}
