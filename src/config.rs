//! List configuration.

/// Default number of slots allocated by a new list.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Configuration for a freezing list.
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Slots allocated at construction (default: 16, minimum 1)
    pub initial_capacity: usize,

    /// Log freeze transitions and growth through `log`
    pub trace_protocol: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            trace_protocol: true,
        }
    }
}

impl ListConfig {
    /// Create a minimal config for testing or constrained environments.
    pub fn minimal() -> Self {
        Self {
            initial_capacity: 1,
            trace_protocol: false,
        }
    }

    /// Create a config for lists expected to hold many elements.
    pub fn large() -> Self {
        Self {
            initial_capacity: 4096,
            trace_protocol: false,
        }
    }

    /// Builder pattern: set the initial capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder pattern: enable or disable protocol tracing.
    pub fn with_trace_protocol(mut self, enable: bool) -> Self {
        self.trace_protocol = enable;
        self
    }

    /// Initial capacity clamped to at least one slot, so doubling always grows.
    pub(crate) fn effective_capacity(&self) -> usize {
        self.initial_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(ListConfig::default().effective_capacity(), DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = ListConfig::default().with_initial_capacity(0);
        assert_eq!(config.effective_capacity(), 1);
    }
}
