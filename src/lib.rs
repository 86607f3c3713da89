//! # Generic DAO
//!
//! A generic, type-safe data access layer: one repository implementation
//! for every entity kind, driven by composable filters.
//!
//! ## Features
//!
//! - **Generic Repository**: Full CRUD, filtered queries, counts and paging
//!   for any registered entity
//! - **Null-Tolerant Criteria**: Unset search values contribute no
//!   constraint, so optional form fields map straight onto filters
//! - **Validated Paths**: Dotted field paths (`"product.category.name"`)
//!   are checked against a static schema
//! - **Sort Directives**: `"-price"` sorts descending, `"name"` ascending
//! - **Safe Bulk Delete**: A delete without criteria never wipes a table
//! - **Pluggable Stores**: In-memory store out of the box, PostgreSQL behind the `postgres` feature
//! - **Configuration-Based**: Default limits and delete policy via YAML configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dao::prelude::*;
//!
//! impl_entity!(Item, "item", "items", {
//!     name: String => String,
//!     price: f64 => Float,
//! });
//!
//! let store = InMemoryStore::new(EntityRegistry::new().with::<Item>());
//! let items = Repository::<Item, _>::new(store)?;
//!
//! items.persist(Item::new("A".to_string(), 10.0)).await?;
//! items.persist(Item::new("B".to_string(), 20.0)).await?;
//!
//! let expensive = QueryFilter::new()
//!     .matching(|cb, root| cb.greater_than(root, "price", Some(15)))
//!     .order_by("-price");
//!
//! assert_eq!(items.count(Some(&expensive)).await?, 1);
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        criteria::CriteriaBuilder,
        entity::{Entity, EntityKind, Field, FieldType},
        error::{DaoError, DaoResult, StoreError},
        field::{FieldValue, ScalarType},
        filter::{DEFAULT_LIMIT, Filter, FilterOptions, QueryFilter, SortDirective},
        path::{Path, Root},
        predicate::{Order, Predicate, SortDirection},
        query::{Page, PageMeta},
        registry::EntityRegistry,
        repository::Repository,
        store::EntityStore,
    };

    // === Macros ===
    pub use crate::impl_entity;

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{BulkDeletePolicy, DaoConfig, EntityConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
