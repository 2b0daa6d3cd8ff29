//! Synchronization primitives.
//!
//! The freeze lock (std or parking_lot) and relaxed counters for protocol
//! statistics.

pub(crate) mod atomics;
pub(crate) mod mutex;
