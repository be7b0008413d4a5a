// ============================================================================
// Entity State Tracking
// ============================================================================
//
// Each tracked entity moves through:
//
//   Added ──save──> Unchanged ──edit──> Modified ──save──> Unchanged
//                       │                   │
//                       └──────remove───────┴──> Deleted ──save──> (gone)
//
// Removing an Added entity discards it without ever reaching the store.
// Modified is derived: an entry is modified when it differs from the
// snapshot taken at its last save.
//
// ============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    /// Tracked but never saved
    Added,

    /// Saved and equal to its snapshot
    Unchanged,

    /// Saved and edited since
    Modified,

    /// Saved and scheduled for removal
    Deleted,
}

impl EntityState {
    /// Check if the next save has work to do for this entry
    pub fn is_pending(&self) -> bool {
        !matches!(self, EntityState::Unchanged)
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityState::Added => write!(f, "ADDED"),
            EntityState::Unchanged => write!(f, "UNCHANGED"),
            EntityState::Modified => write!(f, "MODIFIED"),
            EntityState::Deleted => write!(f, "DELETED"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TrackedEntry<T> {
    pub(crate) entity: T,
    /// Value as of the last save; `None` until the entity is first saved.
    pub(crate) snapshot: Option<T>,
    pub(crate) removed: bool,
}

impl<T: PartialEq> TrackedEntry<T> {
    pub(crate) fn added(entity: T) -> Self {
        Self {
            entity,
            snapshot: None,
            removed: false,
        }
    }

    pub(crate) fn state(&self) -> EntityState {
        match &self.snapshot {
            None => EntityState::Added,
            Some(_) if self.removed => EntityState::Deleted,
            Some(snapshot) if *snapshot != self.entity => EntityState::Modified,
            Some(_) => EntityState::Unchanged,
        }
    }

    pub(crate) fn is_saved(&self) -> bool {
        self.snapshot.is_some()
    }
}
