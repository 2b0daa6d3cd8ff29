//! Diagnostic kinds and predefined codes.

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A hard error - the caller misused the list.
    Error,
    /// A warning - the operation failed but may succeed on retry.
    Warning,
}

impl DiagnosticKind {
    /// Get the display prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
        }
    }
}

/// A diagnostic message with code, message, and optional context.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level.
    pub kind: DiagnosticKind,
    /// Diagnostic code (e.g., "FL001").
    pub code: &'static str,
    /// Primary message.
    pub message: &'static str,
    /// Optional additional context.
    pub note: Option<&'static str>,
    /// Optional fix suggestion.
    pub help: Option<&'static str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub const fn error(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            code,
            message,
            note: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic.
    pub const fn warning(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            code,
            message,
            note: None,
            help: None,
        }
    }

    /// Add a note to this diagnostic.
    pub const fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    /// Add a help message to this diagnostic.
    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[freezelist][{}] {}: {}", self.code, self.kind.prefix(), self.message)
    }
}

// =============================================================================
// Predefined diagnostics (FL0xx - Freeze protocol)
// =============================================================================

/// FL001: Mutation from a thread other than the owner.
pub const FL001: Diagnostic = Diagnostic::error(
    "FL001",
    "list mutated from a thread other than its owner"
).with_note("only the thread that constructed the list may call add() or set()")
 .with_help("send values to the owner thread, or build a new list on this thread");

/// FL002: Mutation after freeze.
pub const FL002: Diagnostic = Diagnostic::error(
    "FL002",
    "list mutated after it was frozen"
).with_note("a foreign read, get_ref() or an explicit freeze() made the list immutable")
 .with_help("finish all owner-thread mutations before sharing the list");

/// FL003: Freeze rejected because a mutation was in flight.
pub const FL003: Diagnostic = Diagnostic::warning(
    "FL003",
    "freeze rejected, owner thread is still mutating"
).with_note("the list stays alive and the owner's mutation completes normally")
 .with_help("retry the read, or synchronize the handoff with the owner thread");

/// FL004: Iterator used off its creator thread.
pub const FL004: Diagnostic = Diagnostic::error(
    "FL004",
    "iterator used from a thread other than its creator"
).with_help("create a new iterator on the thread that consumes it");

/// FL005: Index out of range.
pub const FL005: Diagnostic = Diagnostic::error(
    "FL005",
    "index out of range"
);

/// FL006: Iterator advanced past its end.
pub const FL006: Diagnostic = Diagnostic::error(
    "FL006",
    "iterator advanced past its end"
).with_help("check has_next() before calling try_next()");

/// FL007: Owner mutation raced a freeze in progress.
pub const FL007: Diagnostic = Diagnostic::warning(
    "FL007",
    "mutation rejected, another thread is freezing the list"
).with_note("the freeze may still roll back, in which case the list stays alive")
 .with_help("retry the mutation, or finish mutating before sharing the list");
