//! Core module containing the schema, filter and repository types

pub mod criteria;
pub mod entity;
pub mod error;
pub mod field;
pub mod filter;
pub mod path;
pub mod predicate;
pub mod query;
pub mod registry;
pub mod repository;
pub mod store;

pub use criteria::CriteriaBuilder;
pub use entity::{Entity, EntityKind, Field, FieldType};
pub use error::{DaoError, DaoResult, StoreError};
pub use field::{FieldValue, ScalarType};
pub use filter::{DEFAULT_LIMIT, Filter, FilterOptions, QueryFilter, SortDirective};
pub use path::{Path, Root};
pub use predicate::{ComparisonOp, Expression, Order, Predicate, SortDirection};
pub use query::{Page, PageMeta, SelectQuery};
pub use registry::EntityRegistry;
pub use repository::Repository;
pub use store::EntityStore;
