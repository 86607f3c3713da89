//! In-memory implementation of EntityStore for testing and development

use crate::core::entity::{Entity, EntityKind};
use crate::core::error::StoreError;
use crate::core::predicate::Predicate;
use crate::core::query::SelectQuery;
use crate::core::registry::EntityRegistry;
use crate::core::store::EntityStore;
use crate::storage::eval::{Matcher, compare_documents};
use crate::storage::relations::{Related, resolve, to_stored};
use anyhow::anyhow;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Table = IndexMap<Uuid, Value>;
type Tables = HashMap<&'static str, Table>;

impl Related for Tables {
    fn related(&self, kind: &'static EntityKind, id: Uuid) -> Option<&Value> {
        self.get(kind.table)?.get(&id)
    }
}

/// Current documents of a table with their relations resolved
fn resolved_rows<'t>(
    tables: &'t Tables,
    kind: &'static EntityKind,
) -> impl Iterator<Item = (Uuid, Value)> + 't {
    tables
        .get(kind.table)
        .into_iter()
        .flat_map(|table| table.iter())
        .map(move |(id, doc)| (*id, resolve(doc, kind, tables)))
}

/// In-memory store implementation
///
/// Records are kept as JSON documents, one table per entity kind, in
/// insertion order; relations hold the related id and are resolved when
/// read. Uses RwLock for thread-safe access; clones share the same data.
#[derive(Clone)]
pub struct InMemoryStore {
    registry: Arc<EntityRegistry>,
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store managing the registered kinds
    pub fn new(registry: EntityRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records of a kind
    pub fn len(&self, kind: &EntityKind) -> Result<usize, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(tables.get(kind.table).map_or(0, IndexMap::len))
    }

    fn managed<T: Entity>(&self) -> Result<&'static EntityKind, StoreError> {
        let kind = T::kind();
        if self.registry.contains(kind) {
            Ok(kind)
        } else {
            Err(StoreError::Query {
                backend: "in-memory".to_string(),
                message: format!("entity kind '{}' is not managed by this store", kind.name),
            })
        }
    }
}

fn to_document<T: Entity>(entity: &T) -> Result<Value, StoreError> {
    let doc = serde_json::to_value(entity).map_err(|e| StoreError::Serialization {
        entity_type: T::kind().name.to_string(),
        message: e.to_string(),
    })?;
    to_stored(doc, T::kind())
}

fn from_document<T: Entity>(doc: &Value) -> Result<T, StoreError> {
    T::deserialize(doc).map_err(|e| StoreError::Serialization {
        entity_type: T::kind().name.to_string(),
        message: e.to_string(),
    })
}

/// Assign a fresh identifier when the record has none
fn ensure_id<T: Entity>(entity: &mut T) -> Uuid {
    match entity.id() {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            entity.set_id(id);
            id
        }
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryStore {
    fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<T>, StoreError> {
        let kind = self.managed::<T>()?;
        let matcher = Matcher::new(query.predicate.as_ref())?;
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut rows: Vec<Value> = resolved_rows(&tables, kind)
            .map(|(_, doc)| doc)
            .filter(|doc| matcher.matches(doc))
            .collect();
        if !query.orders.is_empty() {
            rows.sort_by(|a, b| compare_documents(a, b, &query.orders));
        }

        rows.iter()
            .skip(query.offset)
            .take(query.limit)
            .map(from_document)
            .collect()
    }

    async fn count(&self, predicate: Option<&Predicate>) -> Result<u64, StoreError> {
        let kind = self.managed::<T>()?;
        let matcher = Matcher::new(predicate)?;
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(resolved_rows(&tables, kind)
            .filter(|(_, doc)| matcher.matches(doc))
            .count() as u64)
    }

    async fn find_by_key(&self, id: &Uuid) -> Result<Option<T>, StoreError> {
        let kind = self.managed::<T>()?;
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        tables
            .related(kind, *id)
            .map(|doc| from_document(&resolve(doc, kind, &*tables)))
            .transpose()
    }

    async fn insert(&self, mut entity: T) -> Result<T, StoreError> {
        let kind = self.managed::<T>()?;
        let id = ensure_id(&mut entity);
        let doc = to_document(&entity)?;

        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        let table = tables.entry(kind.table).or_default();
        if table.contains_key(&id) {
            return Err(StoreError::Integrity {
                message: format!("{} with id '{}' already exists", kind.name, id),
            });
        }
        table.insert(id, doc);

        Ok(entity)
    }

    async fn merge(&self, mut entity: T) -> Result<T, StoreError> {
        let kind = self.managed::<T>()?;
        let id = ensure_id(&mut entity);
        let doc = to_document(&entity)?;

        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        // IndexMap keeps an existing key in place
        tables.entry(kind.table).or_default().insert(id, doc);

        Ok(entity)
    }

    async fn remove(&self, entity: &T) -> Result<(), StoreError> {
        let kind = self.managed::<T>()?;
        let Some(id) = entity.id() else {
            return Ok(());
        };

        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        if let Some(table) = tables.get_mut(kind.table) {
            table.shift_remove(&id);
        }

        Ok(())
    }

    async fn contains(&self, entity: &T) -> Result<bool, StoreError> {
        let kind = self.managed::<T>()?;
        let Some(id) = entity.id() else {
            return Ok(false);
        };
        let doc = to_document(entity)?;

        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(tables.related(kind, id).is_some_and(|stored| *stored == doc))
    }

    async fn bulk_delete(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        let kind = self.managed::<T>()?;
        let matcher = Matcher::new(Some(predicate))?;

        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        let doomed: HashSet<Uuid> = resolved_rows(&tables, kind)
            .filter(|(_, doc)| matcher.matches(doc))
            .map(|(id, _)| id)
            .collect();
        if let Some(table) = tables.get_mut(kind.table) {
            table.retain(|id, _| !doomed.contains(id));
        }
        Ok(doomed.len() as u64)
    }
}
