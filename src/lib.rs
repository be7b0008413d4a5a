// ============================================================================
// Equivalency Library
// ============================================================================

pub mod context;
pub mod core;
pub mod equivalency;
pub mod json;
pub mod mapper;
pub mod reconcile;

// Re-export main types for convenience
pub use crate::core::{Keyed, MapError, Result};
pub use context::{Entity, EntitySet, EntityState, Persistence, SaveSummary};
pub use equivalency::{Equivalence, by_projection, key_equivalence, never};
pub use mapper::{Mapper, MapperConfig, TypeMap, UnkeyedCollections};
pub use reconcile::{Reconcilable, ReconcileOutcome, ReconcileTarget, SoftDelete, reconcile};
