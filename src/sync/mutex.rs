//! Lock serializing freeze transitions: parking_lot if enabled, std otherwise.
//!
//! It guards no data. Holding a [`FreezeTurn`] is the only thing that
//! matters, so std poisoning carries no information and is ignored.

#[cfg(feature = "parking_lot")]
type RawLock = parking_lot::Mutex<()>;
#[cfg(feature = "parking_lot")]
type RawGuard<'a> = parking_lot::MutexGuard<'a, ()>;

#[cfg(not(feature = "parking_lot"))]
type RawLock = std::sync::Mutex<()>;
#[cfg(not(feature = "parking_lot"))]
type RawGuard<'a> = std::sync::MutexGuard<'a, ()>;

/// Per-list lock taken by threads attempting a freeze.
#[derive(Debug, Default)]
pub(crate) struct FreezeLock(RawLock);

/// Exclusive right to run one freeze transition, released on drop.
pub(crate) struct FreezeTurn<'a> {
    _held: RawGuard<'a>,
}

impl FreezeLock {
    pub fn new() -> Self {
        Self(RawLock::new(()))
    }

    /// Wait for the other freezers of this list, if any.
    pub fn acquire(&self) -> FreezeTurn<'_> {
        #[cfg(feature = "parking_lot")]
        let held = self.0.lock();
        #[cfg(not(feature = "parking_lot"))]
        let held = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        FreezeTurn { _held: held }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_turns_do_not_overlap() {
        let lock = FreezeLock::new();
        let inside = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let _turn = lock.acquire();
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });
    }

    #[test]
    fn test_turn_released_on_drop() {
        let lock = FreezeLock::new();
        drop(lock.acquire());
        let _again = lock.acquire();
    }
}
