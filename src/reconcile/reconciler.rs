use super::{Reconcilable, ReconcileOutcome, ReconcileTarget};
use tracing::{Level, debug_span, event};

/// Reconciles `target` against `source` in place.
///
/// Every target, in collection order, claims the first source item that is
/// still unclaimed and satisfies `equivalence`; the pair is updated through
/// `field_copy`. Unclaimed source items are copied onto `T::default()` and
/// appended. Targets left without a partner are soft-deleted when they
/// expose the capability and removed otherwise.
///
/// Ambiguous predicates are not detected. A target that only matches a
/// source already claimed by an earlier target is treated as orphaned.
///
/// Errors from `field_copy` are returned unchanged. Mutations applied
/// before the failing copy are kept.
pub fn reconcile<S, T, C, Q, F, E>(
    source: &[S],
    target: &mut C,
    mut equivalence: Q,
    mut field_copy: F,
) -> Result<ReconcileOutcome, E>
where
    T: Reconcilable + Default,
    C: ReconcileTarget<T> + ?Sized,
    Q: FnMut(&S, &T) -> bool,
    F: FnMut(&S, &mut T) -> Result<(), E>,
{
    let span = debug_span!("reconcile", source_len = source.len());
    let _guard = span.enter();

    let mut outcome = ReconcileOutcome::default();
    let mut claimed = vec![false; source.len()];
    let mut orphans = Vec::new();

    for (position, item) in target.items_mut().into_iter().enumerate() {
        let partner = (0..source.len())
            .find(|&index| !claimed[index] && equivalence(&source[index], &*item));

        match partner {
            Some(index) => {
                claimed[index] = true;
                field_copy(&source[index], item)?;
                outcome.updated += 1;
            }
            None => orphans.push(position),
        }
    }

    for (index, item) in source.iter().enumerate() {
        if claimed[index] {
            continue;
        }
        let mut created = T::default();
        field_copy(item, &mut created)?;
        target.add_one(created);
        outcome.inserted += 1;
    }

    if !orphans.is_empty() {
        let mut removals = Vec::new();
        let mut items = target.items_mut();
        for position in orphans {
            match items[position].as_soft_delete() {
                Some(deletable) => {
                    if !deletable.is_deleted() {
                        deletable.delete();
                        outcome.soft_deleted += 1;
                    }
                }
                None => removals.push(position),
            }
        }
        drop(items);

        outcome.removed = removals.len();
        target.remove_at(&removals);
    }

    event!(
        Level::DEBUG,
        updated = outcome.updated,
        inserted = outcome.inserted,
        soft_deleted = outcome.soft_deleted,
        removed = outcome.removed,
        "collection reconciled"
    );

    Ok(outcome)
}
