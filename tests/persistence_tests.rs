/// Persistence tests
///
/// DTO-driven inserts, updates and deletes against change-tracked entity sets.
/// Run with: cargo test --test persistence_tests
use equivalency::{
    Entity, EntitySet, EntityState, Keyed, MapError, Mapper, MapperConfig, Reconcilable,
    SaveSummary, SoftDelete, TypeMap,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Thing {
    id: i64,
    title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ThingDto {
    id: i64,
    title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SoftDeleteThing {
    id: i64,
    title: String,
    products: Vec<SoftDeleteProduct>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SoftDeleteProduct {
    id: i64,
    name: String,
    is_deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SoftDeleteThingDto {
    id: i64,
    title: String,
    products: Vec<SoftDeleteProductDto>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SoftDeleteProductDto {
    id: i64,
    name: String,
}

impl Keyed for Thing {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for ThingDto {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Reconcilable for Thing {}

impl Entity for Thing {
    fn set_key(&mut self, key: i64) {
        self.id = key;
    }
}

impl Keyed for SoftDeleteThing {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Reconcilable for SoftDeleteThing {}

impl Entity for SoftDeleteThing {
    fn set_key(&mut self, key: i64) {
        self.id = key;
    }

    fn max_key(&self) -> i64 {
        self.products
            .iter()
            .map(|product| product.max_key())
            .fold(self.id, i64::max)
    }

    fn assign_keys(&mut self, next_key: &mut dyn FnMut() -> i64) {
        if self.is_transient() {
            self.set_key(next_key());
        }
        for product in &mut self.products {
            product.assign_keys(next_key);
        }
    }
}

impl Keyed for SoftDeleteProduct {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl SoftDelete for SoftDeleteProduct {
    fn delete(&mut self) {
        self.is_deleted = true;
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl Reconcilable for SoftDeleteProduct {
    fn as_soft_delete(&mut self) -> Option<&mut dyn SoftDelete> {
        Some(self)
    }
}

impl Entity for SoftDeleteProduct {
    fn set_key(&mut self, key: i64) {
        self.id = key;
    }
}

#[derive(Default)]
struct Db {
    things: EntitySet<Thing>,
    soft_delete_things: EntitySet<SoftDeleteThing>,
}

impl Db {
    fn save_changes(&mut self) -> SaveSummary {
        let mut summary = self.things.save_changes();
        summary += self.soft_delete_things.save_changes();
        summary
    }

    fn soft_delete_products(&self) -> Vec<&SoftDeleteProduct> {
        self.soft_delete_things
            .iter()
            .flat_map(|thing| thing.products.iter())
            .collect()
    }
}

fn configure_mapper() -> Mapper {
    MapperConfig::new()
        .add_map(
            TypeMap::<ThingDto, Thing>::new(|dto, thing, _| {
                thing.title = dto.title.clone();
                Ok(())
            })
            .key_equivalence()
            .reverse_map(|thing, dto, _| {
                dto.id = thing.id;
                dto.title = thing.title.clone();
                Ok(())
            }),
        )
        .add_map(TypeMap::<SoftDeleteThingDto, SoftDeleteThing>::new(
            |dto, thing, mapper| {
                thing.title = dto.title.clone();
                mapper.map_collection(&dto.products, &mut thing.products)?;
                Ok(())
            },
        ))
        .add_map(
            TypeMap::<SoftDeleteProductDto, SoftDeleteProduct>::new(|dto, product, _| {
                product.name = dto.name.clone();
                Ok(())
            })
            .equality_comparison(|dto, product| dto.id == product.id),
        )
        .add_map(TypeMap::<SoftDeleteThing, SoftDeleteThingDto>::new(
            |thing, dto, mapper| {
                dto.id = thing.id;
                dto.title = thing.title.clone();
                dto.products = mapper.map_vec(&thing.products)?;
                Ok(())
            },
        ))
        .add_map(TypeMap::<SoftDeleteProduct, SoftDeleteProductDto>::new(
            |product, dto, _| {
                dto.id = product.id;
                dto.name = product.name.clone();
                Ok(())
            },
        ))
        .build()
        .expect("mapper configuration")
}

fn thing(title: &str) -> Thing {
    Thing {
        id: 0,
        title: title.to_string(),
    }
}

fn product(name: &str) -> SoftDeleteProduct {
    SoftDeleteProduct {
        id: 0,
        name: name.to_string(),
        is_deleted: false,
    }
}

fn seeded_things() -> Db {
    let mut db = Db::default();
    db.things.add(thing("Test2"));
    db.things.add(thing("Test3"));
    db.things.add(thing("Test4"));
    db.save_changes();
    db
}

#[test]
fn test_persist_to_update() {
    let mapper = configure_mapper();
    let mut db = seeded_things();
    assert_eq!(db.things.count(), 3);

    let item_id = db.things.first().unwrap().id;

    db.things
        .persist(&mapper)
        .insert_or_update(&ThingDto {
            id: item_id,
            title: "Test".to_string(),
        })
        .unwrap();

    assert_eq!(db.things.count_in_state(EntityState::Modified), 1);
    assert_eq!(db.things.count(), 3);
    assert_eq!(db.things.find(item_id).unwrap().title, "Test");
}

#[test]
fn test_persist_to_insert() {
    let mapper = configure_mapper();
    let mut db = seeded_things();

    db.things
        .persist(&mapper)
        .insert_or_update(&ThingDto {
            id: 0,
            title: "Test".to_string(),
        })
        .unwrap();

    assert_eq!(db.things.count(), 3);
    assert_eq!(db.things.count_in_state(EntityState::Added), 1);

    db.save_changes();

    assert_eq!(db.things.count(), 4);
    let newest = db.things.iter().max_by_key(|t| t.id).unwrap();
    assert_eq!(newest.title, "Test");
}

#[test]
fn test_persist_remove_schedules_deletion() {
    let mapper = configure_mapper();
    let mut db = seeded_things();
    let item_id = db.things.first().unwrap().id;

    db.things
        .persist(&mapper)
        .remove(&ThingDto {
            id: item_id,
            title: String::new(),
        })
        .unwrap();

    assert_eq!(db.things.count_in_state(EntityState::Deleted), 1);
    assert_eq!(db.things.len(), 2);

    let summary = db.save_changes();
    assert_eq!(summary.deleted, 1);
    assert_eq!(db.things.count(), 2);
    assert!(db.things.find(item_id).is_none());
}

#[test]
fn test_persist_remove_unknown_entity() {
    let mapper = configure_mapper();
    let mut db = seeded_things();

    let result = db.things.persist(&mapper).remove(&ThingDto {
        id: 999,
        title: String::new(),
    });

    assert!(matches!(result, Err(MapError::EntityNotFound(_))));
    assert!(!db.things.has_changes());
}

#[test]
fn test_persist_soft_deletes_capable_entities() {
    let mapper = configure_mapper();
    let mut products = EntitySet::new();
    products.add(product("Product 1"));
    products.add(product("Product 2"));
    products.save_changes();

    products
        .persist(&mapper)
        .remove(&SoftDeleteProductDto {
            id: 2,
            name: String::new(),
        })
        .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products.count_in_state(EntityState::Modified), 1);
    assert!(products.find(2).unwrap().is_deleted);
}

#[test]
fn test_persist_requires_equality_comparison() {
    let mapper = configure_mapper();
    let mut db = Db::default();

    let result = db
        .soft_delete_things
        .persist(&mapper)
        .insert_or_update(&SoftDeleteThingDto::default());

    assert!(matches!(result, Err(MapError::MissingEquivalence { .. })));
    assert!(db.soft_delete_things.is_empty());
}

#[test]
fn test_mapping_parent_soft_deletes_removed_child() {
    let mapper = configure_mapper();
    let mut db = Db::default();
    db.soft_delete_things.add(SoftDeleteThing {
        id: 0,
        title: "Thing 1".to_string(),
        products: vec![
            product("Product 1"),
            product("Product 2"),
            product("Product 3"),
            product("Product 4"),
        ],
    });
    db.save_changes();

    assert_eq!(db.soft_delete_things.count(), 1);
    assert_eq!(db.soft_delete_products().len(), 4);

    let soft_thing = db.soft_delete_things.first_mut().unwrap();
    let mut soft_thing_dto: SoftDeleteThingDto = mapper.map(&*soft_thing).unwrap();

    // Remove Product 4 from dto
    soft_thing_dto.products.remove(3);

    mapper.map_into(&soft_thing_dto, soft_thing).unwrap();
    let summary = db.save_changes();

    assert_eq!(summary.updated, 1);
    let products = db.soft_delete_products();
    assert_eq!(products.len(), 4);
    let deleted: Vec<&str> = products
        .iter()
        .filter(|p| p.is_deleted)
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(deleted, vec!["Product 4"]);
}

#[test]
fn test_child_keys_assigned_on_save() {
    let mut db = Db::default();
    db.soft_delete_things.add(SoftDeleteThing {
        id: 0,
        title: "Thing 1".to_string(),
        products: vec![product("A"), product("B")],
    });
    db.save_changes();

    let keys: Vec<i64> = db.soft_delete_products().iter().map(|p| p.id).collect();
    assert_eq!(keys, vec![2, 3]);
    assert_eq!(db.soft_delete_things.first().unwrap().id, 1);
}

#[test]
fn test_map_collection_into_entity_set() {
    let mapper = configure_mapper();
    let mut db = seeded_things();
    let ids: Vec<i64> = db.things.iter().map(|t| t.id).collect();

    let dtos = vec![
        ThingDto {
            id: ids[0],
            title: "Renamed".to_string(),
        },
        ThingDto {
            id: ids[1],
            title: "Test3".to_string(),
        },
        ThingDto {
            id: 0,
            title: "Brand new".to_string(),
        },
    ];

    let outcome = mapper.map_collection(&dtos, &mut db.things).unwrap();

    assert_eq!(outcome.updated, 2);
    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.removed, 1);
    assert_eq!(db.things.count_in_state(EntityState::Modified), 1);
    assert_eq!(db.things.count_in_state(EntityState::Unchanged), 1);
    assert_eq!(db.things.count_in_state(EntityState::Added), 1);
    assert_eq!(db.things.count_in_state(EntityState::Deleted), 1);

    let summary = db.save_changes();
    assert_eq!(
        summary,
        SaveSummary {
            inserted: 1,
            updated: 1,
            deleted: 1,
        }
    );
    assert_eq!(db.things.count(), 3);
}

#[test]
fn test_new_child_key_skips_existing_child_keys() {
    let mut db = Db::default();
    db.soft_delete_things.add(SoftDeleteThing {
        id: 1,
        title: "Loaded".to_string(),
        products: vec![
            SoftDeleteProduct {
                id: 2,
                name: "A".to_string(),
                is_deleted: false,
            },
            SoftDeleteProduct {
                id: 3,
                name: "B".to_string(),
                is_deleted: false,
            },
        ],
    });
    db.save_changes();

    db.soft_delete_things
        .first_mut()
        .unwrap()
        .products
        .push(product("C"));
    db.save_changes();

    let keys: Vec<i64> = db.soft_delete_products().iter().map(|p| p.id).collect();
    assert_eq!(keys, vec![2, 3, 4]);
}
