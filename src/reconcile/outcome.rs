use serde::{Deserialize, Serialize};
use std::fmt;

/// What a single reconciliation did to its target collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Targets paired with a source item and overwritten in place.
    pub updated: usize,
    /// Source items with no partner, added as new targets.
    pub inserted: usize,
    /// Orphaned targets flagged through their soft delete capability.
    pub soft_deleted: usize,
    /// Orphaned targets taken out of the collection.
    pub removed: usize,
}

impl ReconcileOutcome {
    pub fn deleted(&self) -> usize {
        self.soft_deleted + self.removed
    }

    /// True when the call changed the collection's membership or flags.
    ///
    /// Updates are not counted: a matched pair is always copied onto, even
    /// when the values were already equal.
    pub fn changed_membership(&self) -> bool {
        self.inserted > 0 || self.deleted() > 0
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "updated={} inserted={} soft_deleted={} removed={}",
            self.updated, self.inserted, self.soft_deleted, self.removed
        )
    }
}
