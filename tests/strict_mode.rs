//! Strict mode turns error diagnostics into panics.
//!
//! Kept in its own test binary because strict mode is process-wide.

use freezelist::diagnostics::{self, StrictMode};
use freezelist::FreezingList;

#[test]
#[should_panic(expected = "FL002")]
fn test_strict_mode_panics_on_frozen_mutation() {
    diagnostics::suppress_diagnostics(true);
    diagnostics::set_strict_mode(StrictMode::PanicOnError);

    let list = FreezingList::new();
    list.freeze().unwrap();
    let _ = list.add(1);
}
