//! Filters: predicate, ordering and paging handed to a repository
//!
//! A filter supplies the predicate for a query through
//! [`Filter::predicate`] and carries its sort directives, limit and offset in
//! [`FilterOptions`]. Domain filters embed `FilterOptions` and implement the
//! trait; one-off filters use [`QueryFilter`] with a closure.
//!
//! # Example
//!
//! ```rust,ignore
//! let filter = QueryFilter::<Item>::new()
//!     .matching(|cb, root| cb.greater_than(root, "price", Some(15)))
//!     .order_by_desc("price")
//!     .with_limit(20);
//!
//! let items = repository.get(Some(&filter)).await?;
//! ```

use crate::core::criteria::CriteriaBuilder;
use crate::core::entity::Entity;
use crate::core::error::DaoResult;
use crate::core::path::Root;
use crate::core::predicate::{Order, Predicate, SortDirection};
use std::fmt;
use std::marker::PhantomData;

/// Maximum number of rows returned when nothing else is requested
pub const DEFAULT_LIMIT: usize = 10_000;

/// A field path plus sort direction
///
/// In string form a leading `-` means descending: `"-age"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse the string form (`"name"` or `"-name"`)
    pub fn parse(directive: &str) -> Self {
        match directive.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(directive),
        }
    }
}

impl From<&str> for SortDirective {
    fn from(directive: &str) -> Self {
        Self::parse(directive)
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}", self.field),
            SortDirection::Descending => write!(f, "-{}", self.field),
        }
    }
}

/// Paging and ordering state shared by every filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    limit: usize,
    offset: usize,
    order_by: Vec<SortDirective>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            order_by: Vec::new(),
        }
    }
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries returned
    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Set the number of entries skipped
    pub fn set_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Order by a field; `"-field"` orders descending. Chain for more keys.
    pub fn order_by(&mut self, field: &str) -> &mut Self {
        self.order_by.push(SortDirective::parse(field));
        self
    }

    /// Order descending by a field
    pub fn order_by_desc(&mut self, field: &str) -> &mut Self {
        self.order_by.push(SortDirective::desc(field));
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn sort_directives(&self) -> &[SortDirective] {
        &self.order_by
    }
}

/// A filter restricting the records a repository returns, counts or deletes
pub trait Filter<T: Entity>: Send + Sync {
    /// Build the predicate; `Ok(None)` means no constraint
    fn predicate(&self, cb: &CriteriaBuilder, root: &Root) -> DaoResult<Option<Predicate>>;

    /// Paging and ordering state
    fn options(&self) -> &FilterOptions;

    fn limit(&self) -> usize {
        self.options().limit()
    }

    fn offset(&self) -> usize {
        self.options().offset()
    }

    fn sort_directives(&self) -> &[SortDirective] {
        self.options().sort_directives()
    }

    /// Resolve the sort directives into sort clauses, keeping their order
    fn get_order_by(&self, cb: &CriteriaBuilder, root: &Root) -> DaoResult<Vec<Order>> {
        self.sort_directives()
            .iter()
            .map(|directive| match directive.direction {
                SortDirection::Ascending => cb.asc(root, &directive.field),
                SortDirection::Descending => cb.desc(root, &directive.field),
            })
            .collect()
    }
}

type PredicateFn = dyn Fn(&CriteriaBuilder, &Root) -> DaoResult<Option<Predicate>> + Send + Sync;

/// A filter assembled at the call site from a predicate closure
pub struct QueryFilter<T> {
    predicate: Option<Box<PredicateFn>>,
    options: FilterOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> QueryFilter<T> {
    /// A filter without constraint, default limit and no ordering
    pub fn new() -> Self {
        Self {
            predicate: None,
            options: FilterOptions::default(),
            _marker: PhantomData,
        }
    }

    /// Set the predicate-construction function
    pub fn matching<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CriteriaBuilder, &Root) -> DaoResult<Option<Predicate>> + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn order_by(mut self, field: &str) -> Self {
        self.options.order_by(field);
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.options.order_by_desc(field);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.options.set_limit(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.options.set_offset(offset);
        self
    }
}

impl<T: Entity> Default for QueryFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for QueryFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryFilter")
            .field("has_predicate", &self.predicate.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl<T: Entity> Filter<T> for QueryFilter<T> {
    fn predicate(&self, cb: &CriteriaBuilder, root: &Root) -> DaoResult<Option<Predicate>> {
        match &self.predicate {
            Some(build) => build(cb, root),
            None => Ok(None),
        }
    }

    fn options(&self) -> &FilterOptions {
        &self.options
    }
}
