//! Freeze protocol statistics.

use crate::sync::atomics::AtomicCounter;

/// Snapshot of a list's freeze protocol counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeStats {
    /// Successful `Alive -> Frozen` transitions (0 or 1).
    pub freezes: u64,

    /// Transitions triggered as a side effect of a foreign-thread read.
    pub foreign_freezes: u64,

    /// Freeze attempts rejected because a mutation was in flight.
    pub conflicts: u64,

    /// Times the storage doubled.
    pub growths: u64,
}

impl FreezeStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the list has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.freezes > 0
    }
}

impl std::fmt::Display for FreezeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Freeze Statistics:")?;
        writeln!(f, "  Freezes:         {}", self.freezes)?;
        writeln!(f, "  Foreign freezes: {}", self.foreign_freezes)?;
        writeln!(f, "  Conflicts:       {}", self.conflicts)?;
        writeln!(f, "  Growths:         {}", self.growths)?;
        Ok(())
    }
}

/// Live counters owned by a list.
#[derive(Debug, Default)]
pub(crate) struct ProtocolCounters {
    pub freezes: AtomicCounter,
    pub foreign_freezes: AtomicCounter,
    pub conflicts: AtomicCounter,
    pub growths: AtomicCounter,
}

impl ProtocolCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> FreezeStats {
        FreezeStats {
            freezes: self.freezes.get(),
            foreign_freezes: self.foreign_freezes.get(),
            conflicts: self.conflicts.get(),
            growths: self.growths.get(),
        }
    }
}
