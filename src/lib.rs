//! # freezelist
//!
//! A growable list owned by one thread, mutated without locks, and handed
//! to other threads through a one-time, irreversible freeze.
//!
//! ## Features
//!
//! - Owner-thread reads and writes with zero synchronization
//! - First foreign read freezes the list (one synchronization point, ever)
//! - Frozen lists are read from any thread without synchronization
//! - Freeze never blocks: an in-flight owner mutation makes it fail instead
//! - Thread-confined iterators over stable snapshots
//! - Coded diagnostics through `log`, with a strict mode for CI
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use freezelist::{FreezingList, FreezeListError};
//!
//! let list = Arc::new(FreezingList::new());
//! for i in 0..10 {
//!     list.add(i).unwrap();
//! }
//!
//! let reader = Arc::clone(&list);
//! let sum = std::thread::spawn(move || {
//!     let mut sum = 0;
//!     for i in 0..reader.size().unwrap() {
//!         sum += reader.get(i).unwrap();
//!     }
//!     sum
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(sum, 45);
//! assert_eq!(list.add(10), Err(FreezeListError::Frozen));
//! ```
//!
//! ## Freeze conflicts
//!
//! A foreign read racing an owner `add`/`set` gets
//! [`FreezeListError::FreezeConflict`]; an owner write racing a freeze that
//! is still resolving gets [`FreezeListError::FreezeInProgress`]. Neither
//! side waits, and the crate never retries on the caller's behalf.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod stats;

mod list;
mod sync;

pub use config::ListConfig;
pub use error::{FreezeListError, Result};
pub use list::iter::ThreadConfinedIter;
pub use list::liveness::Liveness;
pub use list::FreezingList;
pub use stats::FreezeStats;
