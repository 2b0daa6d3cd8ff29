//! The freezing list.
//!
//! A growable list owned by the thread that constructed it. The owner reads
//! and writes with no synchronization. The first read from any other thread
//! freezes the list, after which nobody can mutate it and every thread reads
//! it without synchronization.
//!
//! # Thread model
//!
//! | Caller  | Alive list                     | Frozen list        |
//! |---------|--------------------------------|--------------------|
//! | owner   | reads and writes, no sync      | reads only         |
//! | foreign | first read freezes, no writes  | reads only         |

pub(crate) mod iter;
pub(crate) mod liveness;
pub(crate) mod storage;

use std::cell::UnsafeCell;
use std::sync::Arc;
use std::thread::ThreadId;

use crate::config::ListConfig;
use crate::error::{FreezeListError, Result};
use crate::stats::{FreezeStats, ProtocolCounters};

use iter::ThreadConfinedIter;
use liveness::{FreezeOutcome, Liveness, LivenessFlag, MutationGuard, MutationRejected};
use storage::Contents;

/// A list mutated only by its owner thread and frozen on first foreign read.
///
/// Share it across threads with `Arc`. Mutations from the owner never take
/// a lock; [`FreezingList::freeze`] pays a single synchronization cost, once.
///
/// Reads hand out clones of the stored elements. Store `Arc<T>` when
/// elements are expensive to clone, or freeze the list and borrow elements
/// with [`FreezingList::get_ref`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use freezelist::FreezingList;
///
/// let list = Arc::new(FreezingList::new());
/// list.add("foo".to_string()).unwrap();
///
/// let reader = Arc::clone(&list);
/// std::thread::spawn(move || {
///     // First foreign read freezes the list.
///     assert_eq!(reader.size().unwrap(), 1);
///     assert_eq!(reader.get(0).unwrap(), "foo");
/// })
/// .join()
/// .unwrap();
///
/// assert!(list.is_frozen());
/// assert!(list.add("bar".to_string()).is_err());
/// ```
pub struct FreezingList<E> {
    contents: UnsafeCell<Contents<E>>,
    owner: ThreadId,
    liveness: LivenessFlag,
    counters: ProtocolCounters,
    trace_protocol: bool,
}

// SAFETY: contents are mutated only by the owner thread inside a mutation
// guard while alive. Other threads read them only after observing the frozen
// state, which the freeze transition publishes with release/acquire ordering.
unsafe impl<E: Send + Sync> Sync for FreezingList<E> {}

impl<E> FreezingList<E> {
    /// Create an empty list owned by the calling thread.
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    /// Create an empty list with room for `capacity` elements before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(ListConfig::default().with_initial_capacity(capacity))
    }

    /// Create an empty list from a configuration.
    pub fn with_config(config: ListConfig) -> Self {
        Self {
            contents: UnsafeCell::new(Contents::with_capacity(config.effective_capacity())),
            owner: std::thread::current().id(),
            liveness: LivenessFlag::new(),
            counters: ProtocolCounters::new(),
            trace_protocol: config.trace_protocol,
        }
    }

    /// Thread that constructed the list.
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread owns the list.
    #[inline]
    pub fn is_owner(&self) -> bool {
        std::thread::current().id() == self.owner
    }

    /// Whether the list has been frozen.
    pub fn is_frozen(&self) -> bool {
        !self.liveness.is_alive()
    }

    /// Current liveness state.
    pub fn liveness(&self) -> Liveness {
        self.liveness.liveness()
    }

    /// Freeze protocol counters.
    pub fn stats(&self) -> FreezeStats {
        self.counters.snapshot()
    }

    /// Make the list permanently immutable.
    ///
    /// Calling it on a frozen list succeeds without effect. Never blocks on
    /// the owner thread.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::FreezeConflict`] if the owner thread is inside
    /// `add` or `set`. The list stays alive; the caller may retry.
    pub fn freeze(&self) -> Result<()> {
        self.transition(false)
    }

    /// Number of elements.
    ///
    /// Freezes the list when called from a foreign thread on a live list.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::FreezeConflict`] if that freeze is rejected.
    pub fn size(&self) -> Result<usize> {
        self.ensure_readable()?;
        Ok(self.contents().len)
    }

    /// Whether the list is empty. Same freezing behavior as [`size`](Self::size).
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Slots available before the next growth.
    pub fn capacity(&self) -> Result<usize> {
        self.ensure_readable()?;
        Ok(self.contents().slots.capacity())
    }

    /// Freeze the list, from any thread, and borrow an element.
    ///
    /// The borrow is valid for the list's lifetime because a frozen list
    /// never changes again. Unlike [`get`](Self::get), this also freezes
    /// when called by the owner.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::FreezeConflict`] if the freeze is rejected,
    /// [`FreezeListError::OutOfRange`] if `index >= size`.
    pub fn get_ref(&self, index: usize) -> Result<&E> {
        if self.liveness.is_alive() {
            self.transition(!self.is_owner())?;
        }
        let contents = self.contents();
        // SAFETY: frozen; nothing replaces the slots anymore.
        unsafe { contents.get(index) }.ok_or_else(|| self.out_of_range(index, contents.len))
    }

    /// Append an element. Always returns `Ok(true)` on success.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::WrongOwner`] off the owner thread,
    /// [`FreezeListError::Frozen`] once frozen,
    /// [`FreezeListError::FreezeInProgress`] while another thread is
    /// resolving a freeze.
    pub fn add(&self, element: E) -> Result<bool> {
        let guard = self.begin_mutation()?;
        self.push(&guard, element);
        Ok(true)
    }

    /// Append every element of `iter` as a single mutation, returning how
    /// many were added.
    ///
    /// The owner stays inside the mutation while `iter` produces elements,
    /// so freezes attempted meanwhile fail with
    /// [`FreezeListError::FreezeConflict`].
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add), reported before anything is appended.
    pub fn extend_from_iter<I: IntoIterator<Item = E>>(&self, iter: I) -> Result<usize> {
        let guard = self.begin_mutation()?;
        let mut count = 0;
        for element in iter {
            self.push(&guard, element);
            count += 1;
        }
        Ok(count)
    }

    /// Iterator over a snapshot of the current elements, confined to the
    /// calling thread.
    ///
    /// Freezes the list when called from a foreign thread on a live list.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::FreezeConflict`] if that freeze is rejected.
    pub fn iter(&self) -> Result<ThreadConfinedIter<E>> {
        self.ensure_readable()?;
        let contents = self.contents();
        Ok(ThreadConfinedIter::new(Arc::clone(&contents.slots), contents.len))
    }

    /// Handle to the element at `index`, taken without running element code.
    fn shared(&self, index: usize) -> Result<Arc<E>> {
        self.ensure_readable()?;
        let contents = self.contents();
        // SAFETY: owner thread or frozen list; only reference counts change
        // while the slot is borrowed.
        unsafe { contents.share(index) }.ok_or_else(|| self.out_of_range(index, contents.len))
    }

    fn push(&self, guard: &MutationGuard<'_>, element: E) {
        let contents = self.contents_mut(guard);

        if contents.is_full() {
            let capacity = contents.grow();
            self.counters.growths.increment();
            if self.trace_protocol {
                log::trace!("grew list storage to {} slots", capacity);
            }
        }

        // SAFETY: owner thread inside a mutation; the slot is past every
        // snapshot's length and unborrowed.
        unsafe { contents.push(element) };
    }

    fn transition(&self, foreign_read: bool) -> Result<()> {
        match self.liveness.freeze() {
            Ok(FreezeOutcome::AlreadyFrozen) => Ok(()),
            Ok(FreezeOutcome::Transitioned) => {
                self.counters.freezes.increment();
                if foreign_read {
                    self.counters.foreign_freezes.increment();
                }
                if self.trace_protocol {
                    log::debug!(
                        "froze list owned by {:?} from {:?} (foreign read: {})",
                        self.owner,
                        std::thread::current().id(),
                        foreign_read
                    );
                }
                Ok(())
            }
            Err(in_flight) => {
                self.counters.conflicts.increment();
                crate::fl_emit_ctx!(FL003, self.owner, false);
                Err(FreezeListError::FreezeConflict { in_flight })
            }
        }
    }

    /// Freeze on foreign access to a live list.
    #[inline]
    fn ensure_readable(&self) -> Result<()> {
        if self.liveness.is_alive() && !self.is_owner() {
            self.transition(true)?;
        }
        Ok(())
    }

    fn begin_mutation(&self) -> Result<MutationGuard<'_>> {
        let caller = std::thread::current().id();
        if caller != self.owner {
            crate::fl_emit_ctx!(FL001, self.owner, self.is_frozen());
            return Err(FreezeListError::WrongOwner {
                owner: self.owner,
                caller,
            });
        }
        match self.liveness.enter_mutation() {
            Ok(guard) => Ok(guard),
            Err(MutationRejected::Freezing) => {
                crate::fl_emit_ctx!(FL007, self.owner, false);
                Err(FreezeListError::FreezeInProgress)
            }
            Err(MutationRejected::Frozen) => {
                crate::fl_emit_ctx!(FL002, self.owner, true);
                Err(FreezeListError::Frozen)
            }
        }
    }

    fn out_of_range(&self, index: usize, size: usize) -> FreezeListError {
        crate::fl_emit!(FL005);
        FreezeListError::OutOfRange { index, size }
    }

    /// Shared view of the contents.
    ///
    /// Callers must be the owner thread or have observed the frozen state.
    fn contents(&self) -> &Contents<E> {
        // SAFETY: see the method contract. Only the owner creates a mutable
        // view, and shared views are never held across element code, so a
        // re-entrant mutation cannot overlap one.
        unsafe { &*self.contents.get() }
    }

    /// Exclusive view of the contents for the duration of a mutation.
    #[allow(clippy::mut_from_ref)]
    fn contents_mut(&self, _guard: &MutationGuard<'_>) -> &mut Contents<E> {
        // SAFETY: a mutation guard exists only on the owner thread of a live
        // list, and freezing is rejected while it is held, so no other
        // thread can read the contents meanwhile.
        unsafe { &mut *self.contents.get() }
    }
}

impl<E: Clone> FreezingList<E> {
    /// Clone of the element at `index`.
    ///
    /// Freezes the list when called from a foreign thread on a live list.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::FreezeConflict`] if that freeze is rejected,
    /// [`FreezeListError::OutOfRange`] if `index >= size`.
    pub fn get(&self, index: usize) -> Result<E> {
        let shared = self.shared(index)?;
        Ok(E::clone(&shared))
    }

    /// Replace the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`FreezeListError::WrongOwner`] off the owner thread,
    /// [`FreezeListError::Frozen`] once frozen,
    /// [`FreezeListError::FreezeInProgress`] while another thread is
    /// resolving a freeze,
    /// [`FreezeListError::OutOfRange`] if `index >= size`.
    pub fn set(&self, index: usize, element: E) -> Result<E> {
        let guard = self.begin_mutation()?;
        let (swapped, size) = {
            let contents = self.contents_mut(&guard);
            // SAFETY: owner thread inside a mutation; readers borrow a slot
            // only while copying its handle out.
            (unsafe { contents.replace(index, element) }, contents.len)
        };
        drop(guard);

        match swapped {
            Ok(previous) => Ok(Arc::try_unwrap(previous).unwrap_or_else(|shared| E::clone(&shared))),
            Err(_) => Err(self.out_of_range(index, size)),
        }
    }

    /// Copy the elements into a `Vec`. Same freezing behavior as [`iter`](Self::iter).
    pub fn to_vec(&self) -> Result<Vec<E>> {
        Ok(self.iter()?.collect())
    }
}

impl<E: PartialEq> FreezingList<E> {
    /// Position of the first element equal to `value`.
    ///
    /// Freezes the list when called from a foreign thread on a live list.
    pub fn index_of(&self, value: &E) -> Result<Option<usize>> {
        let mut snapshot = self.iter()?;
        for index in 0..snapshot.remaining() {
            if *snapshot.next_shared()? == *value {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Whether any element equals `value`. Same freezing behavior as
    /// [`index_of`](Self::index_of).
    pub fn contains(&self, value: &E) -> Result<bool> {
        Ok(self.index_of(value)?.is_some())
    }
}

impl<E> Default for FreezingList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for FreezingList<E> {
    /// Never freezes: the size is shown only when readable without a
    /// transition.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let readable = self.is_frozen() || self.is_owner();
        let size = readable.then(|| self.contents().len);
        f.debug_struct("FreezingList")
            .field("owner", &self.owner)
            .field("liveness", &self.liveness())
            .field("size", &size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let list = FreezingList::new();
        assert_eq!(list.add("foo"), Ok(true));
        assert_eq!(list.size(), Ok(1));
        assert_eq!(list.get(0), Ok("foo"));
    }

    #[test]
    fn test_set() {
        let list = FreezingList::new();
        list.add("foo").unwrap();
        assert_eq!(list.set(0, "bar"), Ok("foo"));
        assert_eq!(list.size(), Ok(1));
        assert_eq!(list.get(0), Ok("bar"));
    }

    #[test]
    fn test_add_after_freeze() {
        let list = FreezingList::new();
        list.freeze().unwrap();
        assert_eq!(list.add("foo"), Err(FreezeListError::Frozen));
    }

    #[test]
    fn test_set_after_freeze() {
        let list = FreezingList::new();
        list.add("foo").unwrap();
        list.freeze().unwrap();
        assert_eq!(list.set(0, "bar"), Err(FreezeListError::Frozen));
        assert_eq!(list.get(0), Ok("foo"));
    }

    #[test]
    fn test_set_out_of_range() {
        let list = FreezingList::new();
        list.add(1).unwrap();
        assert_eq!(
            list.set(1, 2),
            Err(FreezeListError::OutOfRange { index: 1, size: 1 })
        );
    }

    #[test]
    fn test_empty_list_rejects_index_zero() {
        let list = FreezingList::<u32>::new();
        assert_eq!(
            list.get(0),
            Err(FreezeListError::OutOfRange { index: 0, size: 0 })
        );
        assert_eq!(list.is_empty(), Ok(true));
    }

    #[test]
    fn test_growth_preserves_elements() {
        let list = FreezingList::with_capacity(2);
        for i in 0..100 {
            list.add(i).unwrap();
        }
        for i in 0..100 {
            assert_eq!(list.get(i), Ok(i));
        }
        assert_eq!(list.capacity(), Ok(128));
        assert_eq!(list.stats().growths, 6);
    }

    #[test]
    fn test_freeze_twice() {
        let list = FreezingList::<u8>::new();
        list.freeze().unwrap();
        list.freeze().unwrap();
        assert_eq!(list.stats().freezes, 1);
        assert_eq!(list.liveness(), Liveness::Frozen);
    }

    #[test]
    fn test_owner_reads_do_not_freeze() {
        let list = FreezingList::new();
        list.add(3).unwrap();
        list.size().unwrap();
        list.get(0).unwrap();
        list.iter().unwrap();
        assert!(!list.is_frozen());
    }

    #[test]
    fn test_get_ref_freezes_owner() {
        let list = FreezingList::new();
        list.add(String::from("x")).unwrap();

        let first = list.get_ref(0).unwrap();
        assert_eq!(first, "x");
        assert!(list.is_frozen());
        assert_eq!(list.add(String::from("y")), Err(FreezeListError::Frozen));
        assert_eq!(list.stats().foreign_freezes, 0);
    }

    #[test]
    fn test_contains_and_index_of() {
        let list = FreezingList::new();
        list.extend_from_iter(["a", "b", "c"]).unwrap();
        assert_eq!(list.index_of(&"b"), Ok(Some(1)));
        assert_eq!(list.contains(&"z"), Ok(false));
    }

    #[test]
    fn test_extend_rejected_before_appending() {
        let list = FreezingList::new();
        list.freeze().unwrap();
        assert_eq!(list.extend_from_iter([1, 2]), Err(FreezeListError::Frozen));
    }

    #[test]
    fn test_set_returns_previous_while_snapshot_holds_it() {
        let list = FreezingList::new();
        list.add(String::from("old")).unwrap();
        let snapshot = list.iter().unwrap();

        assert_eq!(list.set(0, String::from("new")), Ok(String::from("old")));
        assert_eq!(snapshot.collect::<Vec<_>>(), vec![String::from("old")]);
        assert_eq!(list.get(0), Ok(String::from("new")));
    }

    #[test]
    fn test_freeze_conflicts_with_open_mutation() {
        use std::sync::mpsc;

        let list = FreezingList::new();
        list.add(0).unwrap();

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let elements = (1..=2).inspect(move |&i| {
            if i == 1 {
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            }
        });

        std::thread::scope(|s| {
            let list = &list;
            let reader = s.spawn(move || {
                entered_rx.recv().unwrap();
                let freeze = list.freeze();
                let size = list.size();
                release_tx.send(()).unwrap();
                (freeze, size)
            });

            assert_eq!(list.extend_from_iter(elements), Ok(2));

            let (freeze, size) = reader.join().unwrap();
            let conflict = FreezeListError::FreezeConflict { in_flight: 1 };
            assert_eq!(freeze, Err(conflict.clone()));
            assert_eq!(size, Err(conflict));
        });

        let stats = list.stats();
        assert_eq!(stats.conflicts, 2);
        assert_eq!(stats.freezes, 0);
        assert_eq!(list.liveness(), Liveness::Alive);
        assert_eq!(list.add(3), Ok(true));
        assert_eq!(list.to_vec(), Ok(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_debug_does_not_freeze() {
        let list = std::sync::Arc::new(FreezingList::<u8>::new());
        let reader = std::sync::Arc::clone(&list);
        let rendered = std::thread::spawn(move || format!("{:?}", reader))
            .join()
            .unwrap();

        assert!(rendered.contains("size: None"));
        assert!(!list.is_frozen());
    }
}
