// ============================================================================
// Collection Reconciliation
// ============================================================================
//
// Makes a target collection of entities match a source sequence of DTOs:
// matched targets are updated in place, unmatched sources become new
// targets, unmatched targets are soft-deleted or removed.
//
// ============================================================================

pub mod capability;
pub mod outcome;
pub mod reconciler;
pub mod target;

pub use capability::{Reconcilable, SoftDelete};
pub use outcome::ReconcileOutcome;
pub use reconciler::reconcile;
pub use target::ReconcileTarget;
