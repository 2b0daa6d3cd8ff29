//! Coded diagnostics for freeze protocol misuse.
//!
//! Every error a list or iterator returns is also reported here with a
//! stable code, so misuse shows up in logs even when the caller discards the
//! `Result`.
//!
//! ## Diagnostic Codes
//!
//! | Code  | Meaning                                  |
//! |-------|------------------------------------------|
//! | FL001 | Mutation from a non-owner thread         |
//! | FL002 | Mutation after freeze                    |
//! | FL003 | Freeze rejected, mutation in flight      |
//! | FL004 | Iterator used off its creator thread     |
//! | FL005 | Index out of range                       |
//! | FL006 | Iterator advanced past its end           |
//! | FL007 | Mutation raced a freeze in progress      |
//!
//! Output goes through the `log` facade. Debug builds always emit; release
//! builds emit only with the `diagnostics` feature. Strict mode turns error
//! diagnostics into panics, which is useful in CI.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use freezelist::diagnostics::{self, StrictMode};
//!
//! diagnostics::init_from_env(); // reads FREEZELIST_STRICT
//! diagnostics::set_strict_mode(StrictMode::PanicOnError);
//! ```

pub mod context;
pub mod emit;
pub mod kind;
pub mod macros;
pub mod strict;

pub use context::DiagContext;
pub use emit::{emit, emit_with_context, is_suppressed, suppress_diagnostics};
pub use kind::{Diagnostic, DiagnosticKind};
pub use strict::{init_from_env, set_strict_mode, strict_mode, StrictMode};

pub use kind::{FL001, FL002, FL003, FL004, FL005, FL006, FL007};
