//! Store trait: the persistence context a repository runs against

use crate::core::entity::Entity;
use crate::core::error::StoreError;
use crate::core::predicate::Predicate;
use crate::core::query::SelectQuery;
use crate::core::registry::EntityRegistry;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence operations for one entity type
///
/// Implementations execute already-built queries; they never see filters or
/// unresolved field names. A store may report [`StoreError::NoResult`] when a
/// query matches nothing, which the repository treats as an empty result.
/// Any other error is propagated to the caller unchanged.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// The kinds this store manages
    fn registry(&self) -> &EntityRegistry;

    /// Execute a select: predicate, ordering, then offset and limit
    async fn select(&self, query: &SelectQuery) -> Result<Vec<T>, StoreError>;

    /// Count the rows matching a predicate (`None` counts every row)
    async fn count(&self, predicate: Option<&Predicate>) -> Result<u64, StoreError>;

    /// Primary-key lookup
    async fn find_by_key(&self, id: &Uuid) -> Result<Option<T>, StoreError>;

    /// Insert a new record, generating its identifier when unset
    async fn insert(&self, entity: T) -> Result<T, StoreError>;

    /// Write a record by identity, inserting it when unknown
    async fn merge(&self, entity: T) -> Result<T, StoreError>;

    /// Remove a tracked record
    async fn remove(&self, entity: &T) -> Result<(), StoreError>;

    /// Whether this exact record state is what the store currently holds
    async fn contains(&self, entity: &T) -> Result<bool, StoreError>;

    /// Delete every row matching the predicate, returning the affected count
    async fn bulk_delete(&self, predicate: &Predicate) -> Result<u64, StoreError>;
}
