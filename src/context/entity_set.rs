use super::persist::Persistence;
use super::state::{EntityState, TrackedEntry};
use super::Entity;
use crate::core::{Keyed, MapError, Result};
use crate::mapper::Mapper;
use crate::reconcile::ReconcileTarget;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use tracing::{Level, event, info_span};

/// What a call to `save_changes` wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SaveSummary {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.deleted == 0
    }
}

impl AddAssign for SaveSummary {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.deleted += other.deleted;
    }
}

/// Tracked set of entities of one type.
///
/// "Live" entities are the ones a caller can still see and edit: everything
/// except entries scheduled for deletion. `count` instead reports what the
/// store holds, i.e. saved rows, including rows whose deletion has not been
/// saved yet.
#[derive(Debug, Clone)]
pub struct EntitySet<T> {
    entries: Vec<TrackedEntry<T>>,
    next_key: i64,
}

impl<T: Entity> EntitySet<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 1,
        }
    }

    /// Start tracking a new entity; it is inserted by the next save.
    pub fn add(&mut self, entity: T) {
        self.entries.push(TrackedEntry::added(entity));
    }

    /// Remove the live entity with `key`.
    pub fn remove(&mut self, key: i64) -> Result<()> {
        let position = self
            .iter()
            .position(|entity| entity.key() == key)
            .ok_or(MapError::EntityNotFound(std::any::type_name::<T>()))?;
        self.remove_at(&[position]);
        Ok(())
    }

    /// Live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries
            .iter()
            .filter(|entry| !entry.removed)
            .map(|entry| &entry.entity)
    }

    pub(crate) fn live_mut(&mut self, position: usize) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .filter(|entry| !entry.removed)
            .nth(position)
            .map(|entry| &mut entry.entity)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows the store holds as of the last save.
    pub fn count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_saved()).count()
    }

    pub fn find(&self, key: i64) -> Option<&T> {
        self.iter().find(|entity| entity.key() == key)
    }

    pub fn find_mut(&mut self, key: i64) -> Option<&mut T> {
        let position = self.iter().position(|entity| entity.key() == key)?;
        self.live_mut(position)
    }

    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    pub fn first_mut(&mut self) -> Option<&mut T> {
        self.live_mut(0)
    }

    /// Every tracked entry with its current state.
    pub fn entries(&self) -> impl Iterator<Item = (EntityState, &T)> {
        self.entries
            .iter()
            .map(|entry| (entry.state(), &entry.entity))
    }

    pub fn count_in_state(&self, state: EntityState) -> usize {
        self.entries().filter(|(s, _)| *s == state).count()
    }

    pub fn has_changes(&self) -> bool {
        self.entries().any(|(state, _)| state.is_pending())
    }

    /// Bind this set to a mapper for DTO-driven inserts, updates and removals.
    pub fn persist<'a>(&'a mut self, mapper: &'a Mapper) -> Persistence<'a, T>
    where
        T: 'static,
    {
        Persistence::new(self, mapper)
    }

    /// Apply pending changes: assign keys to new entities, drop deleted
    /// ones, and take fresh snapshots of everything that remains.
    pub fn save_changes(&mut self) -> SaveSummary {
        let span = info_span!("save_changes", entity = std::any::type_name::<T>());
        let _guard = span.enter();

        let mut summary = SaveSummary::default();
        let Self { entries, next_key } = self;

        if let Some(highest) = entries.iter().map(|entry| entry.entity.max_key()).max() {
            *next_key = (*next_key).max(highest + 1);
        }
        let mut allocate = || {
            let key = *next_key;
            *next_key += 1;
            key
        };

        entries.retain_mut(|entry| match entry.state() {
            EntityState::Deleted => {
                summary.deleted += 1;
                false
            }
            state => {
                match state {
                    EntityState::Added => summary.inserted += 1,
                    EntityState::Modified => summary.updated += 1,
                    _ => {}
                }
                if state != EntityState::Unchanged {
                    entry.entity.assign_keys(&mut allocate);
                    entry.snapshot = Some(entry.entity.clone());
                }
                true
            }
        });

        event!(
            Level::INFO,
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            "changes saved"
        );

        summary
    }
}

impl<T: Entity> Default for EntitySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> ReconcileTarget<T> for EntitySet<T> {
    fn items_mut(&mut self) -> Vec<&mut T> {
        self.entries
            .iter_mut()
            .filter(|entry| !entry.removed)
            .map(|entry| &mut entry.entity)
            .collect()
    }

    fn add_one(&mut self, item: T) {
        self.add(item);
    }

    /// Saved entries are marked for deletion; unsaved ones are discarded.
    fn remove_at(&mut self, positions: &[usize]) {
        let live: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.removed)
            .map(|(index, _)| index)
            .collect();

        for &position in positions.iter().rev() {
            let Some(&index) = live.get(position) else {
                continue;
            };
            if self.entries[index].is_saved() {
                self.entries[index].removed = true;
            } else {
                self.entries.remove(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Reconcilable;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Note {
        id: i64,
        text: String,
    }

    impl Keyed for Note {
        type Key = i64;

        fn key(&self) -> i64 {
            self.id
        }
    }

    impl Reconcilable for Note {}

    impl Entity for Note {
        fn set_key(&mut self, key: i64) {
            self.id = key;
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: 0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_save_assigns_sequential_keys() {
        let mut set = EntitySet::new();
        set.add(note("a"));
        set.add(note("b"));

        assert_eq!(set.count(), 0);
        assert_eq!(set.count_in_state(EntityState::Added), 2);

        let summary = set.save_changes();

        assert_eq!(summary.inserted, 2);
        assert_eq!(set.count(), 2);
        let keys: Vec<i64> = set.iter().map(|n| n.id).collect();
        assert_eq!(keys, vec![1, 2]);
        assert!(!set.has_changes());
    }

    #[test]
    fn test_edit_is_detected_as_modified() {
        let mut set = EntitySet::new();
        set.add(note("a"));
        set.save_changes();

        set.first_mut().unwrap().text = "changed".to_string();

        assert_eq!(set.count_in_state(EntityState::Modified), 1);
        assert_eq!(set.save_changes().updated, 1);
        assert_eq!(set.count_in_state(EntityState::Unchanged), 1);
    }

    #[test]
    fn test_remove_saved_entity_waits_for_save() {
        let mut set = EntitySet::new();
        set.add(note("a"));
        set.save_changes();

        set.remove(1).unwrap();

        assert!(set.is_empty());
        assert_eq!(set.count(), 1);
        assert_eq!(set.count_in_state(EntityState::Deleted), 1);

        assert_eq!(set.save_changes().deleted, 1);
        assert_eq!(set.count(), 0);
    }

    #[test]
    fn test_remove_unsaved_entity_is_discarded() {
        let mut set = EntitySet::new();
        set.add(note("a"));
        set.save_changes();
        set.add(note("b"));

        set.remove_at(&[1]);

        assert_eq!(set.len(), 1);
        assert!(!set.has_changes());
    }

    #[test]
    fn test_remove_unknown_key() {
        let mut set: EntitySet<Note> = EntitySet::new();
        assert!(matches!(set.remove(42), Err(MapError::EntityNotFound(_))));
    }

    #[test]
    fn test_keys_continue_after_explicit_keys() {
        let mut set = EntitySet::new();
        set.add(Note {
            id: 10,
            text: "imported".to_string(),
        });
        set.add(note("fresh"));
        set.save_changes();

        assert!(set.find(10).is_some());
        assert_eq!(set.find(11).map(|n| n.text.as_str()), Some("fresh"));
    }
}
