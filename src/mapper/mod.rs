// ============================================================================
// Mapper
// ============================================================================
//
// Maps values between configured type pairs. Collections are mapped through
// the reconciler so that existing targets keep their identity.
//
// ============================================================================

pub mod config;

pub use config::{FieldCopy, MapperConfig, TypeMap, UnkeyedCollections};

use crate::core::{MapError, Result};
use crate::equivalency::{Equivalence, never};
use crate::reconcile::{Reconcilable, ReconcileOutcome, ReconcileTarget, reconcile};
use config::MapKey;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use tracing::{Level, event};

/// Maps values using a validated `MapperConfig`.
pub struct Mapper {
    maps: HashMap<MapKey, Box<dyn Any + Send + Sync>>,
    unkeyed_collections: UnkeyedCollections,
}

impl Mapper {
    pub fn new(config: MapperConfig) -> Result<Self> {
        config.validate()?;

        let maps = config
            .maps
            .into_iter()
            .map(|registered| (registered.key, registered.map))
            .collect::<HashMap<_, _>>();

        event!(Level::DEBUG, maps = maps.len(), "mapper configured");

        Ok(Self {
            maps,
            unkeyed_collections: config.unkeyed_collections,
        })
    }

    fn type_map<S: 'static, T: 'static>(&self) -> Result<&TypeMap<S, T>> {
        self.maps
            .get(&(TypeId::of::<S>(), TypeId::of::<T>()))
            .and_then(|map| map.downcast_ref::<TypeMap<S, T>>())
            .ok_or_else(MapError::missing_map::<S, T>)
    }

    pub fn has_map<S: 'static, T: 'static>(&self) -> bool {
        self.type_map::<S, T>().is_ok()
    }

    /// Equality comparison registered for `S -> T`, if any.
    pub fn equivalence<S: 'static, T: 'static>(&self) -> Option<Equivalence<S, T>> {
        self.type_map::<S, T>().ok()?.equivalence.clone()
    }

    /// Map `source` onto a fresh `T`.
    pub fn map<S: 'static, T: Default + 'static>(&self, source: &S) -> Result<T> {
        let mut target = T::default();
        self.map_into(source, &mut target)?;
        Ok(target)
    }

    /// Map `source` onto an existing `target` in place.
    pub fn map_into<S: 'static, T: 'static>(&self, source: &S, target: &mut T) -> Result<()> {
        let map = self.type_map::<S, T>()?;
        (map.copy)(source, target, self)
    }

    /// Map every item of `source` into a new vector, without reconciliation.
    pub fn map_vec<S: 'static, T: Default + 'static>(&self, source: &[S]) -> Result<Vec<T>> {
        source.iter().map(|item| self.map(item)).collect()
    }

    /// Reconcile `target` against `source` using the registered map.
    ///
    /// Pairs are found with the map's equality comparison. Without one the
    /// collection is replaced, or rejected when configured with
    /// `UnkeyedCollections::Reject`.
    pub fn map_collection<S, T, C>(&self, source: &[S], target: &mut C) -> Result<ReconcileOutcome>
    where
        S: 'static,
        T: Reconcilable + Default + 'static,
        C: ReconcileTarget<T> + ?Sized,
    {
        let map = self.type_map::<S, T>()?;
        let copy = |item: &S, entity: &mut T| (map.copy)(item, entity, self);

        match (&map.equivalence, self.unkeyed_collections) {
            (Some(equivalence), _) => reconcile(
                source,
                target,
                |item: &S, entity: &T| equivalence(item, entity),
                copy,
            ),
            (None, UnkeyedCollections::Replace) => {
                reconcile(source, target, never::<S, T>(), copy)
            }
            (None, UnkeyedCollections::Reject) => Err(MapError::missing_equivalence::<S, T>()),
        }
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("maps", &self.maps.len())
            .field("unkeyed_collections", &self.unkeyed_collections)
            .finish()
    }
}
