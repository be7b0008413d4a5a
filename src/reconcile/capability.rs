/// Logical deletion for items that must outlive their removal from a collection.
///
/// An orphaned item that exposes this capability is flagged and left in place
/// instead of being removed, so later readers can still see what went away.
pub trait SoftDelete {
    /// Transitions the item to its logically deleted state.
    fn delete(&mut self);

    fn is_deleted(&self) -> bool;
}

/// Target-side contract of the reconciler.
///
/// Types that support soft deletion override `as_soft_delete` to hand out
/// themselves; everything else keeps the default and is hard-removed when
/// orphaned.
pub trait Reconcilable {
    fn as_soft_delete(&mut self) -> Option<&mut dyn SoftDelete> {
        None
    }
}
