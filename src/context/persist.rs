use super::{Entity, EntitySet};
use crate::core::{MapError, Result};
use crate::mapper::Mapper;
use crate::reconcile::ReconcileTarget;
use std::any::type_name;
use tracing::{Level, event};

/// DTO-driven writes against one `EntitySet`.
///
/// Existing entities are located with the equality comparison the mapper
/// has for `S -> T`; nothing is written to the store until the set's
/// changes are saved.
pub struct Persistence<'a, T> {
    set: &'a mut EntitySet<T>,
    mapper: &'a Mapper,
}

impl<'a, T: Entity + 'static> Persistence<'a, T> {
    pub(crate) fn new(set: &'a mut EntitySet<T>, mapper: &'a Mapper) -> Self {
        Self { set, mapper }
    }

    fn locate<S: 'static>(&self, source: &S) -> Result<Option<usize>> {
        let equivalence = self
            .mapper
            .equivalence::<S, T>()
            .ok_or_else(MapError::missing_equivalence::<S, T>)?;
        Ok(self.set.iter().position(|entity| equivalence(source, entity)))
    }

    /// Update the matching entity in place, or add a new one mapped from `source`.
    pub fn insert_or_update<S: 'static>(&mut self, source: &S) -> Result<()> {
        match self.locate(source)? {
            Some(position) => {
                let entity = self
                    .set
                    .live_mut(position)
                    .ok_or(MapError::EntityNotFound(type_name::<T>()))?;
                self.mapper.map_into(source, entity)?;
                event!(Level::DEBUG, entity = type_name::<T>(), "persist updated entity");
            }
            None => {
                let created: T = self.mapper.map(source)?;
                self.set.add(created);
                event!(Level::DEBUG, entity = type_name::<T>(), "persist added entity");
            }
        }
        Ok(())
    }

    /// Soft-delete the matching entity when it supports it, otherwise
    /// schedule it for removal.
    pub fn remove<S: 'static>(&mut self, source: &S) -> Result<()> {
        let position = self
            .locate(source)?
            .ok_or(MapError::EntityNotFound(type_name::<T>()))?;

        let entity = self
            .set
            .live_mut(position)
            .ok_or(MapError::EntityNotFound(type_name::<T>()))?;
        match entity.as_soft_delete() {
            Some(deletable) => deletable.delete(),
            None => self.set.remove_at(&[position]),
        }
        Ok(())
    }
}
