/// A mutable collection the reconciler can update in place.
///
/// Positions always refer to the order of `items_mut`. Items added through
/// `add_one` go to the end of that order, so positions taken before an
/// insert stay valid after it.
pub trait ReconcileTarget<T> {
    /// Live items, in collection order.
    fn items_mut(&mut self) -> Vec<&mut T>;

    fn add_one(&mut self, item: T);

    /// Removes the items at `positions` (ascending, no duplicates).
    fn remove_at(&mut self, positions: &[usize]);
}

impl<T> ReconcileTarget<T> for Vec<T> {
    fn items_mut(&mut self) -> Vec<&mut T> {
        self.iter_mut().collect()
    }

    fn add_one(&mut self, item: T) {
        self.push(item);
    }

    fn remove_at(&mut self, positions: &[usize]) {
        for &position in positions.iter().rev() {
            self.remove(position);
        }
    }
}
