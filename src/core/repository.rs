//! Generic repository over one entity type
//!
//! [`Repository`] turns filters into [`SelectQuery`]s and runs them against
//! an [`EntityStore`]. It provides the whole CRUD surface for any registered
//! entity kind, so per-entity data access only needs a filter type (or a
//! free function building one) instead of hand-written queries.

use crate::config::{BulkDeletePolicy, DaoConfig};
use crate::core::criteria::CriteriaBuilder;
use crate::core::entity::{Entity, EntityKind};
use crate::core::error::{DaoError, DaoResult, StoreError};
use crate::core::filter::Filter;
use crate::core::path::Root;
use crate::core::query::{Page, PageMeta, SelectQuery};
use crate::core::store::EntityStore;
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic data access for entity type `T` backed by store `S`
///
/// # Example
///
/// ```rust,ignore
/// let registry = EntityRegistry::new().with::<Item>();
/// let items = Repository::<Item, _>::new(InMemoryStore::new(registry))?;
///
/// items.persist(Item::new("bolt", 10.0)).await?;
///
/// let expensive = QueryFilter::new()
///     .matching(|cb, root| cb.greater_than(root, "price", Some(15)))
///     .order_by_desc("price");
/// let rows = items.get(Some(&expensive)).await?;
/// ```
pub struct Repository<T, S> {
    store: S,
    config: DaoConfig,
    default_limit: usize,
    cb: CriteriaBuilder,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> Repository<T, S>
where
    T: Entity,
    S: EntityStore<T>,
{
    /// Create a repository with the default configuration
    ///
    /// Fails with [`DaoError::InvalidEntityKind`] when `T` is not registered
    /// with the store.
    pub fn new(store: S) -> DaoResult<Self> {
        Self::with_config(store, DaoConfig::default())
    }

    /// Create a repository with an explicit configuration
    pub fn with_config(store: S, config: DaoConfig) -> DaoResult<Self> {
        let kind = T::kind();
        if !store.registry().contains(kind) || !config.allows(kind.name) {
            return Err(DaoError::InvalidEntityKind {
                kind: kind.name.to_string(),
            });
        }

        let default_limit = config.default_limit_for(kind.name);
        Ok(Self {
            store,
            config,
            default_limit,
            cb: CriteriaBuilder::new(),
            _marker: PhantomData,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn kind(&self) -> &'static EntityKind {
        T::kind()
    }

    /// All records, capped by the default limit
    pub async fn get_all(&self) -> DaoResult<Vec<T>> {
        self.get(None).await
    }

    /// Records matching the filter, ordered and paged as it requests
    ///
    /// Without a filter every record is returned up to the default limit.
    pub async fn get(&self, filter: Option<&dyn Filter<T>>) -> DaoResult<Vec<T>> {
        let query = self.select_query(filter)?;
        self.run_select(&query).await
    }

    /// The first record the filter selects
    pub async fn first(&self, filter: Option<&dyn Filter<T>>) -> DaoResult<Option<T>> {
        let mut query = self.select_query(filter)?;
        query.limit = query.limit.min(1);
        Ok(self.run_select(&query).await?.into_iter().next())
    }

    /// One page of records plus pagination metadata
    pub async fn page(&self, filter: Option<&dyn Filter<T>>) -> DaoResult<Page<T>> {
        let query = self.select_query(filter)?;
        let data = self.run_select(&query).await?;
        let total = self.count_matching(&query).await?;
        Ok(Page {
            data,
            pagination: PageMeta::new(query.limit, query.offset, total),
        })
    }

    /// Number of records matching the filter (ordering and paging ignored)
    pub async fn count(&self, filter: Option<&dyn Filter<T>>) -> DaoResult<u64> {
        let root = Root::of::<T>();
        let mut query = SelectQuery::new(T::kind(), self.default_limit);
        if let Some(filter) = filter {
            query.predicate = filter.predicate(&self.cb, &root)?;
        }
        self.count_matching(&query).await
    }

    /// Record with the given identifier, `None` if absent
    pub async fn find(&self, id: &Uuid) -> DaoResult<Option<T>> {
        Ok(self.store.find_by_key(id).await?)
    }

    /// Insert a new record; the returned value carries generated fields
    pub async fn persist(&self, entity: T) -> DaoResult<T> {
        let stored = self.store.insert(entity).await?;
        tracing::debug!(entity = T::kind().name, id = ?stored.id(), "Persisted record");
        Ok(stored)
    }

    /// Same as [`Repository::persist`]
    pub async fn insert(&self, entity: T) -> DaoResult<T> {
        self.persist(entity).await
    }

    /// Write a record by identity
    pub async fn merge(&self, entity: T) -> DaoResult<T> {
        let stored = self.store.merge(entity).await?;
        tracing::debug!(entity = T::kind().name, id = ?stored.id(), "Merged record");
        Ok(stored)
    }

    /// Same as [`Repository::merge`]
    pub async fn update(&self, entity: T) -> DaoResult<T> {
        self.merge(entity).await
    }

    /// Delete the record with the given identifier, if it exists
    pub async fn delete(&self, id: &Uuid) -> DaoResult<()> {
        if let Some(entity) = self.store.find_by_key(id).await? {
            self.store.remove(&entity).await?;
            tracing::debug!(entity = T::kind().name, id = %id, "Deleted record");
        }
        Ok(())
    }

    /// Delete every record matching the filter, returning how many went
    ///
    /// A missing filter, or one whose predicate is unset, would delete the
    /// whole table: that is refused according to the configured
    /// [`BulkDeletePolicy`] and nothing is deleted.
    pub async fn delete_where(&self, filter: Option<&dyn Filter<T>>) -> DaoResult<u64> {
        let predicate = match filter {
            Some(filter) => filter.predicate(&self.cb, &Root::of::<T>())?,
            None => None,
        };

        let Some(predicate) = predicate else {
            return self.refuse_unconditional_delete();
        };

        let deleted = self.store.bulk_delete(&predicate).await?;
        tracing::info!(
            entity = T::kind().name,
            predicate = %predicate,
            deleted,
            "There were {} items deleted",
            deleted
        );
        Ok(deleted)
    }

    /// Delete a record by value
    ///
    /// A record the store does not track in this exact state is merged
    /// first, so deleting works whatever the instance's origin.
    pub async fn delete_entity(&self, entity: &T) -> DaoResult<()> {
        let target = if self.store.contains(entity).await? {
            entity.clone()
        } else {
            self.store.merge(entity.clone()).await?
        };
        self.store.remove(&target).await?;
        tracing::debug!(entity = T::kind().name, id = ?target.id(), "Deleted record");
        Ok(())
    }

    fn select_query(&self, filter: Option<&dyn Filter<T>>) -> DaoResult<SelectQuery> {
        let root = Root::of::<T>();
        let mut query = SelectQuery::new(T::kind(), self.default_limit);
        if let Some(filter) = filter {
            query.predicate = filter.predicate(&self.cb, &root)?;
            query.orders = filter.get_order_by(&self.cb, &root)?;
            query.limit = filter.limit();
            query.offset = filter.offset();
        }
        Ok(query)
    }

    async fn run_select(&self, query: &SelectQuery) -> DaoResult<Vec<T>> {
        tracing::debug!(
            entity = query.kind.name,
            predicate = ?query.predicate.as_ref().map(ToString::to_string),
            orders = query.orders.len(),
            limit = query.limit,
            offset = query.offset,
            "Executing select"
        );
        match self.store.select(query).await {
            Ok(rows) => Ok(rows),
            Err(StoreError::NoResult) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn count_matching(&self, query: &SelectQuery) -> DaoResult<u64> {
        tracing::debug!(
            entity = query.kind.name,
            predicate = ?query.predicate.as_ref().map(ToString::to_string),
            "Executing count"
        );
        match self.store.count(query.predicate.as_ref()).await {
            Ok(total) => Ok(total),
            Err(StoreError::NoResult) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn refuse_unconditional_delete(&self) -> DaoResult<u64> {
        let kind = T::kind().name;
        match self.config.bulk_delete {
            BulkDeletePolicy::Skip => {
                tracing::warn!(entity = kind, "Executing a delete without any criteria. Ignoring!");
                Ok(0)
            }
            BulkDeletePolicy::Reject => {
                tracing::warn!(entity = kind, "Rejected a delete without any criteria");
                Err(DaoError::UnconditionalDelete {
                    kind: kind.to_string(),
                })
            }
        }
    }
}
