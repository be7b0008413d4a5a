// ============================================================================
// Change-Tracking Context
// ============================================================================
//
// In-memory stand-in for an ORM's entity sets: entities are tracked with a
// state, keys are handed out on save, and removals become deletions the
// next time changes are saved. Nothing here performs I/O.
//
// ============================================================================

pub mod entity_set;
pub mod persist;
pub mod state;

pub use entity_set::{EntitySet, SaveSummary};
pub use persist::Persistence;
pub use state::EntityState;

use crate::core::Keyed;
use crate::reconcile::Reconcilable;

/// A type whose instances live in an `EntitySet`.
///
/// Keys are `i64` surrogate keys; `0` means the entity has not been saved.
pub trait Entity: Reconcilable + Keyed<Key = i64> + Clone + PartialEq + Default {
    fn set_key(&mut self, key: i64);

    /// Hands out keys to this entity and anything it owns that is still unsaved.
    ///
    /// Aggregates override this to reach their child collections.
    /// Highest key held by this entity or anything it owns.
    ///
    /// Aggregates that override `assign_keys` override this as well, so new
    /// keys never collide with keys their children already carry.
    fn max_key(&self) -> i64 {
        self.key()
    }

    fn assign_keys(&mut self, next_key: &mut dyn FnMut() -> i64) {
        if self.is_transient() {
            self.set_key(next_key());
        }
    }
}
