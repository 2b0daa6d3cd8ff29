//! Thread-confined iteration over a list snapshot.

use std::sync::Arc;
use std::thread::ThreadId;

use super::storage::Slots;
use crate::error::{FreezeListError, Result};

/// Cursor over a `(storage, size)` snapshot, usable only on the thread that
/// created it.
///
/// The iterator may be moved to another thread, but every call made there
/// fails with [`FreezeListError::WrongThread`]. It keeps its own reference to
/// the storage, so growth of the list after creation does not affect it.
///
/// # Example
///
/// ```
/// use freezelist::FreezingList;
///
/// let list = FreezingList::new();
/// for i in 0..10 {
///     list.add(i).unwrap();
/// }
///
/// let sum: i32 = list.iter().unwrap().sum();
/// assert_eq!(sum, 45);
/// ```
pub struct ThreadConfinedIter<E> {
    slots: Arc<Slots<E>>,
    len: usize,
    cursor: usize,
    creator: ThreadId,
}

impl<E> ThreadConfinedIter<E> {
    pub(crate) fn new(slots: Arc<Slots<E>>, len: usize) -> Self {
        Self {
            slots,
            len,
            cursor: 0,
            creator: std::thread::current().id(),
        }
    }

    /// Thread this iterator is confined to.
    pub fn creator(&self) -> ThreadId {
        self.creator
    }

    /// Elements left before exhaustion.
    pub fn remaining(&self) -> usize {
        self.len - self.cursor
    }

    /// Whether another element is available.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::WrongThread`] off the creator thread.
    pub fn has_next(&self) -> Result<bool> {
        self.check_thread()?;
        Ok(self.cursor < self.len)
    }

    fn check_thread(&self) -> Result<()> {
        let caller = std::thread::current().id();
        if caller != self.creator {
            crate::fl_emit_ctx!(FL004, self.creator, false);
            return Err(FreezeListError::WrongThread {
                creator: self.creator,
                caller,
            });
        }
        Ok(())
    }

    /// Handle to the next element, advancing the cursor. Runs no element
    /// code while the slot is borrowed.
    pub(crate) fn next_shared(&mut self) -> Result<Arc<E>> {
        self.check_thread()?;
        if self.cursor >= self.len {
            crate::fl_emit!(FL006);
            return Err(FreezeListError::Exhausted);
        }

        // SAFETY: the creator is either the owner, which is the only writer
        // and is running this call, or a thread that froze the list before
        // taking the snapshot. Slots below the snapshot length are occupied.
        let shared = unsafe { self.slots.share(self.cursor) }.ok_or(FreezeListError::Exhausted)?;
        self.cursor += 1;
        Ok(shared)
    }
}

impl<E: Clone> ThreadConfinedIter<E> {
    /// Return the next element and advance.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::WrongThread`] off the creator thread,
    /// [`FreezeListError::Exhausted`] past the end.
    pub fn try_next(&mut self) -> Result<E> {
        let shared = self.next_shared()?;
        Ok(E::clone(&shared))
    }
}

impl<E: Clone> Iterator for ThreadConfinedIter<E> {
    type Item = E;

    /// # Panics
    ///
    /// Panics when called off the creator thread. Use
    /// [`ThreadConfinedIter::try_next`] to get an error instead.
    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.check_thread() {
            panic!("{}", err);
        }
        if self.cursor >= self.len {
            return None;
        }
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<E: Clone> ExactSizeIterator for ThreadConfinedIter<E> {}

impl<E> std::fmt::Debug for ThreadConfinedIter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadConfinedIter")
            .field("creator", &self.creator)
            .field("cursor", &self.cursor)
            .field("len", &self.len)
            .finish()
    }
}
