//! Diagnostic context - thread and list state awareness.

use std::thread::ThreadId;

/// Diagnostic context containing runtime state.
#[derive(Debug, Clone)]
pub struct DiagContext {
    /// Current thread ID.
    pub thread_id: ThreadId,
    /// Thread name (if available).
    pub thread_name: Option<String>,
    /// Thread the list or iterator is confined to.
    pub confined_to: ThreadId,
    /// Whether the list was frozen when the diagnostic fired.
    pub frozen: bool,
}

impl DiagContext {
    /// Capture the current thread against the thread an object is confined to.
    pub fn capture(confined_to: ThreadId, frozen: bool) -> Self {
        let thread = std::thread::current();
        Self {
            thread_id: thread.id(),
            thread_name: thread.name().map(String::from),
            confined_to,
            frozen,
        }
    }

    /// Format context for diagnostic output.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref name) = self.thread_name {
            parts.push(format!("thread=\"{}\"", name));
        } else {
            parts.push(format!("thread={:?}", self.thread_id));
        }

        if self.thread_id != self.confined_to {
            parts.push(format!("confined_to={:?}", self.confined_to));
        }

        if self.frozen {
            parts.push("frozen=true".to_string());
        }

        parts.join(", ")
    }
}

impl std::fmt::Display for DiagContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_thread_context() {
        let ctx = DiagContext::capture(std::thread::current().id(), false);
        assert!(!ctx.format().contains("confined_to"));
        assert!(!ctx.format().contains("frozen"));
    }

    #[test]
    fn test_foreign_thread_context() {
        let owner = std::thread::current().id();
        let ctx = std::thread::Builder::new()
            .name("reader".into())
            .spawn(move || DiagContext::capture(owner, true))
            .unwrap()
            .join()
            .unwrap();

        let formatted = ctx.format();
        assert!(formatted.contains("thread=\"reader\""));
        assert!(formatted.contains("confined_to="));
        assert!(formatted.contains("frozen=true"));
    }
}
