use super::Mapper;
use crate::core::{Keyed, MapError, Result};
use crate::equivalency::{Equivalence, key_equivalence};
use std::any::{Any, TypeId, type_name};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Copies mapped fields from a source value onto a target value.
///
/// The mapper is handed in so nested values and collections can be mapped
/// with the same configuration.
pub type FieldCopy<S, T> = Arc<dyn Fn(&S, &mut T, &Mapper) -> Result<()> + Send + Sync>;

/// How `Mapper::map_collection` treats a type pair without an equality
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnkeyedCollections {
    /// Orphan every target and insert every source item.
    #[default]
    Replace,
    /// Refuse with `MapError::MissingEquivalence`.
    Reject,
}

/// Mapping from `S` to `T`, built up before it is added to a `MapperConfig`.
pub struct TypeMap<S, T> {
    pub(crate) copy: FieldCopy<S, T>,
    pub(crate) equivalence: Option<Equivalence<S, T>>,
    reverse: Option<FieldCopy<T, S>>,
}

impl<S: 'static, T: 'static> TypeMap<S, T> {
    pub fn new<F>(copy: F) -> Self
    where
        F: Fn(&S, &mut T, &Mapper) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            copy: Arc::new(copy),
            equivalence: None,
            reverse: None,
        }
    }

    /// Pairs source and target items with a custom predicate when mapping
    /// collections, e.g. by a business key.
    pub fn equality_comparison<Q>(mut self, equivalence: Q) -> Self
    where
        Q: Fn(&S, &T) -> bool + Send + Sync + 'static,
    {
        self.equivalence = Some(Arc::new(equivalence));
        self
    }

    /// Pairs items by key, treating unset source keys as new.
    pub fn key_equivalence<K>(self) -> Self
    where
        S: Keyed<Key = K>,
        T: Keyed<Key = K>,
        K: PartialEq + Default + Clone + fmt::Debug + 'static,
    {
        self.equality_comparison(key_equivalence::<S, T, K>())
    }

    /// Registers the `T -> S` direction together with this map.
    ///
    /// The reverse map carries no equality comparison of its own.
    pub fn reverse_map<F>(mut self, copy: F) -> Self
    where
        F: Fn(&T, &mut S, &Mapper) -> Result<()> + Send + Sync + 'static,
    {
        self.reverse = Some(Arc::new(copy));
        self
    }

    pub fn has_equivalence(&self) -> bool {
        self.equivalence.is_some()
    }
}

impl<S, T> fmt::Debug for TypeMap<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMap")
            .field("source", &type_name::<S>())
            .field("target", &type_name::<T>())
            .field("equivalence", &self.equivalence.is_some())
            .field("reverse", &self.reverse.is_some())
            .finish()
    }
}

pub(crate) type MapKey = (TypeId, TypeId);

pub(crate) struct RegisteredMap {
    pub(crate) key: MapKey,
    pub(crate) source_type: &'static str,
    pub(crate) target_type: &'static str,
    pub(crate) map: Box<dyn Any + Send + Sync>,
}

impl RegisteredMap {
    fn new<S: 'static, T: 'static>(map: TypeMap<S, T>) -> Self {
        Self {
            key: (TypeId::of::<S>(), TypeId::of::<T>()),
            source_type: type_name::<S>(),
            target_type: type_name::<T>(),
            map: Box::new(map),
        }
    }
}

/// Mapper configuration
///
/// Built once, validated, then turned into a `Mapper`. There is no global
/// registry: every mapper owns the configuration it was created from.
///
/// # Examples
///
/// ```
/// use equivalency::{MapperConfig, TypeMap};
///
/// #[derive(Default)]
/// struct ThingDto { id: i64, title: String }
/// #[derive(Default)]
/// struct Thing { id: i64, title: String }
///
/// let config = MapperConfig::new().add_map(
///     TypeMap::<ThingDto, Thing>::new(|dto, thing, _| {
///         thing.title = dto.title.clone();
///         Ok(())
///     })
///     .equality_comparison(|dto, thing| dto.id == thing.id),
/// );
/// assert!(config.validate().is_ok());
/// ```
pub struct MapperConfig {
    pub(crate) maps: Vec<RegisteredMap>,
    pub(crate) unkeyed_collections: UnkeyedCollections,
}

impl MapperConfig {
    pub fn new() -> Self {
        Self {
            maps: Vec::new(),
            unkeyed_collections: UnkeyedCollections::default(),
        }
    }

    /// Add a type map, plus its reverse direction if one was configured
    pub fn add_map<S: 'static, T: 'static>(mut self, mut map: TypeMap<S, T>) -> Self {
        if let Some(reverse) = map.reverse.take() {
            self.maps.push(RegisteredMap::new(TypeMap::<T, S> {
                copy: reverse,
                equivalence: None,
                reverse: None,
            }));
        }
        self.maps.push(RegisteredMap::new(map));
        self
    }

    /// Set how collections without an equality comparison are mapped
    pub fn unkeyed_collections(mut self, strategy: UnkeyedCollections) -> Self {
        self.unkeyed_collections = strategy;
        self
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for registered in &self.maps {
            if !seen.insert(registered.key) {
                return Err(MapError::InvalidConfiguration(format!(
                    "map from '{}' to '{}' is registered more than once",
                    registered.source_type, registered.target_type
                )));
            }
        }
        Ok(())
    }

    pub fn build(self) -> Result<Mapper> {
        Mapper::new(self)
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .maps
            .iter()
            .map(|m| format!("{} -> {}", m.source_type, m.target_type))
            .collect();
        f.debug_struct("MapperConfig")
            .field("maps", &pairs)
            .field("unkeyed_collections", &self.unkeyed_collections)
            .finish()
    }
}
