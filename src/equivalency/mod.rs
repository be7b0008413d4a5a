// ============================================================================
// Equivalence Predicates
// ============================================================================
//
// An equivalence decides whether a source item and a target item describe
// the same logical entity. The reconciler only ever asks this question; it
// never inspects keys itself.
//
// ============================================================================

use crate::core::Keyed;
use std::sync::Arc;

/// Shared, type-erased equivalence as stored in a mapper configuration.
pub type Equivalence<S, T> = Arc<dyn Fn(&S, &T) -> bool + Send + Sync>;

/// Pairs items whose keys are equal.
///
/// A source item whose key is still the default value is new and matches
/// nothing, so two unsaved items are never taken for one another.
pub fn key_equivalence<S, T, K>() -> impl Fn(&S, &T) -> bool + Send + Sync + Copy
where
    S: Keyed<Key = K>,
    T: Keyed<Key = K>,
    K: PartialEq + Default + Clone + std::fmt::Debug,
{
    |source: &S, target: &T| !source.is_transient() && source.key() == target.key()
}

/// Pairs items by a derived business key instead of the surrogate key.
pub fn by_projection<S, T, K, PS, PT>(
    source_key: PS,
    target_key: PT,
) -> impl Fn(&S, &T) -> bool + Send + Sync
where
    K: PartialEq,
    PS: Fn(&S) -> K + Send + Sync,
    PT: Fn(&T) -> K + Send + Sync,
{
    move |source: &S, target: &T| source_key(source) == target_key(target)
}

/// Matches nothing; every reconciliation becomes a full replace.
pub fn never<S, T>() -> impl Fn(&S, &T) -> bool + Send + Sync + Copy {
    |_: &S, _: &T| false
}
