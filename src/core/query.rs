//! Assembled queries and pagination metadata

use crate::core::entity::EntityKind;
use crate::core::predicate::{Order, Predicate};
use serde::Serialize;

/// A complete select: what the repository hands to a store
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Entity kind being selected
    pub kind: &'static EntityKind,

    /// Row condition; `None` selects every row
    pub predicate: Option<Predicate>,

    /// Sort clauses in priority order
    pub orders: Vec<Order>,

    /// Maximum number of rows returned
    pub limit: usize,

    /// Number of rows skipped after ordering
    pub offset: usize,
}

impl SelectQuery {
    pub fn new(kind: &'static EntityKind, limit: usize) -> Self {
        Self {
            kind,
            predicate: None,
            orders: Vec::new(),
            limit,
            offset: 0,
        }
    }
}

/// Paginated response structure
///
/// This structure wraps one page of results with metadata about the
/// pagination state.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PageMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Maximum number of items per page
    pub limit: usize,

    /// Number of items skipped
    pub offset: usize,

    /// Total number of items (after filters)
    pub total: u64,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PageMeta {
    /// Create pagination metadata from an offset window and a total count
    pub fn new(limit: usize, offset: usize, total: u64) -> Self {
        let end = offset.saturating_add(limit) as u64;
        Self {
            limit,
            offset,
            total,
            has_next: end < total,
            has_prev: offset > 0,
        }
    }
}
