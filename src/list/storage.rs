//! Backing storage shared between a list and its iterator snapshots.

use std::cell::UnsafeCell;
use std::sync::Arc;

/// Fixed-capacity slot array.
///
/// Slots below the owning list's size are always occupied; slots at or
/// above it are empty. Each element sits behind its own `Arc`, so a reader
/// can take a handle out of a slot without running element code and keep it
/// while the owner replaces the slot or regrows the array. Access goes
/// through unsafe methods whose contract is enforced by the list's ownership
/// and freeze protocol.
pub(crate) struct Slots<E> {
    cells: Box<[UnsafeCell<Option<Arc<E>>>]>,
}

// SAFETY: slots are written only by the owner thread while the list is
// alive, and only read by other threads after the freeze transition has
// published those writes.
unsafe impl<E: Send + Sync> Send for Slots<E> {}
unsafe impl<E: Send + Sync> Sync for Slots<E> {}

impl<E> Slots<E> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: (0..capacity).map(|_| UnsafeCell::new(None)).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Borrow a slot's element.
    ///
    /// # Safety
    ///
    /// No call to `replace` on this slot may happen while the returned
    /// reference is alive, from this thread or any other.
    pub unsafe fn get(&self, index: usize) -> Option<&E> {
        self.cells
            .get(index)
            .and_then(|cell| (*cell.get()).as_deref())
    }

    /// Take a handle to a slot's element.
    ///
    /// Only reference counts are touched, so no element code runs while the
    /// slot is borrowed.
    ///
    /// # Safety
    ///
    /// No other thread may be writing this slot.
    pub unsafe fn share(&self, index: usize) -> Option<Arc<E>> {
        self.cells
            .get(index)
            .and_then(|cell| (*cell.get()).as_ref().map(Arc::clone))
    }

    /// Store `value` in a slot, returning its previous content.
    ///
    /// # Safety
    ///
    /// Caller must be the only thread touching the slots, with no live
    /// reference obtained from `get` for this slot.
    pub unsafe fn replace(&self, index: usize, value: E) -> Option<Arc<E>> {
        std::mem::replace(&mut *self.cells[index].get(), Some(Arc::new(value)))
    }
}

/// Storage reference plus the number of occupied slots.
pub(crate) struct Contents<E> {
    pub slots: Arc<Slots<E>>,
    pub len: usize,
}

impl<E> Contents<E> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Slots::with_capacity(capacity)),
            len: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.capacity()
    }

    /// Borrow the element at `index`, or `None` when `index >= len`.
    ///
    /// # Safety
    ///
    /// Same contract as [`Slots::get`].
    pub unsafe fn get(&self, index: usize) -> Option<&E> {
        if index < self.len {
            self.slots.get(index)
        } else {
            None
        }
    }

    /// Handle to the element at `index`, or `None` when `index >= len`.
    ///
    /// # Safety
    ///
    /// Same contract as [`Slots::share`].
    pub unsafe fn share(&self, index: usize) -> Option<Arc<E>> {
        if index < self.len {
            self.slots.share(index)
        } else {
            None
        }
    }

    /// Append into the first free slot. The caller grows a full array first.
    ///
    /// # Safety
    ///
    /// Same contract as [`Slots::replace`].
    pub unsafe fn push(&mut self, value: E) {
        self.slots.replace(self.len, value);
        self.len += 1;
    }

    /// Swap the element at `index`, or hand `value` back untouched when
    /// `index >= len`.
    ///
    /// # Safety
    ///
    /// Same contract as [`Slots::replace`].
    pub unsafe fn replace(&mut self, index: usize, value: E) -> Result<Arc<E>, E> {
        if index >= self.len {
            return Err(value);
        }
        match &mut *self.slots.cells[index].get() {
            Some(slot) => Ok(std::mem::replace(slot, Arc::new(value))),
            None => Err(value),
        }
    }

    /// Double the capacity.
    ///
    /// When no iterator snapshot shares the old array, element handles are
    /// moved. Otherwise they are shared with the snapshots. Either way only
    /// reference counts change. Returns the new capacity.
    pub fn grow(&mut self) -> usize {
        let new_capacity = self.slots.capacity() * 2;
        let mut grown = Slots::with_capacity(new_capacity);
        let len = self.len;

        match Arc::get_mut(&mut self.slots) {
            Some(old) => {
                for (dst, src) in grown.cells.iter_mut().zip(old.cells.iter_mut()).take(len) {
                    *dst.get_mut() = src.get_mut().take();
                }
            }
            None => {
                for (index, dst) in grown.cells.iter_mut().enumerate().take(len) {
                    // SAFETY: growth runs on the owner thread inside a
                    // mutation, so nothing writes the old array concurrently.
                    *dst.get_mut() = unsafe { self.slots.share(index) };
                }
            }
        }

        self.slots = Arc::new(grown);
        new_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, values: &[u32]) -> Contents<u32> {
        let mut contents = Contents::with_capacity(capacity);
        for &value in values {
            if contents.is_full() {
                contents.grow();
            }
            unsafe { contents.push(value) };
        }
        contents
    }

    #[test]
    fn test_grow_moves_unshared_elements() {
        let mut contents = filled(2, &[1, 2]);
        assert!(contents.is_full());

        assert_eq!(contents.grow(), 4);
        assert_eq!(unsafe { contents.slots.get(0) }, Some(&1));
        assert_eq!(unsafe { contents.slots.get(1) }, Some(&2));
        assert_eq!(unsafe { contents.slots.get(2) }, None);
    }

    #[test]
    fn test_grow_keeps_shared_snapshot_intact() {
        let mut contents = filled(2, &[7, 8]);
        let snapshot = Arc::clone(&contents.slots);

        contents.grow();

        assert!(!Arc::ptr_eq(&snapshot, &contents.slots));
        assert_eq!(unsafe { snapshot.get(1) }, Some(&8));
        assert_eq!(unsafe { contents.slots.get(1) }, Some(&8));

        let old = unsafe { snapshot.share(1) }.unwrap();
        let new = unsafe { contents.slots.share(1) }.unwrap();
        assert!(Arc::ptr_eq(&old, &new));
    }

    #[test]
    fn test_shared_handle_outlives_replace() {
        let contents = filled(1, &[5]);
        let held = unsafe { contents.slots.share(0) }.unwrap();

        let previous = unsafe { contents.slots.replace(0, 6) }.unwrap();
        assert!(Arc::ptr_eq(&held, &previous));
        assert_eq!(*held, 5);
        assert_eq!(unsafe { contents.slots.get(0) }, Some(&6));
    }

    #[test]
    fn test_get_past_capacity_is_none() {
        let contents = filled(1, &[3]);
        assert_eq!(unsafe { contents.slots.get(5) }, None);
    }

    #[test]
    fn test_access_past_len_is_none() {
        let mut contents = filled(4, &[3]);
        assert_eq!(unsafe { contents.get(1) }, None);
        assert!(unsafe { contents.share(1) }.is_none());
        assert_eq!(unsafe { contents.replace(1, 9) }.err(), Some(9));
        assert_eq!(unsafe { contents.get(0) }, Some(&3));
    }
}
