//! Shared test harness for store backend testing
//!
//! Provides the `Item` and `Supplier` test entities (with a relation for
//! dotted-path filters), an `Unregistered` kind that no store manages, and
//! helper functions for creating test data.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod store_contract_tests;

use dao::core::registry::EntityRegistry;
use dao::core::repository::Repository;
use dao::core::store::EntityStore;
use dao::impl_entity;

// ---------------------------------------------------------------------------
// Test entities
// ---------------------------------------------------------------------------

impl_entity!(
    Supplier,
    "supplier",
    "suppliers",
    {
        name: String => String,
        country: String => String,
    }
);

impl_entity!(
    Item,
    "item",
    "items",
    {
        name: String => String,
        price: f64 => Float,
        stock: i64 => Integer,
        active: bool => Boolean,
    },
    relations {
        supplier: Option<Supplier> => Supplier,
    }
);

// Deliberately absent from `test_registry()`
impl_entity!(
    Unregistered,
    "unregistered",
    "unregistered",
    {
        label: String => String,
    }
);

/// Registry with every kind the contract suite persists
pub fn test_registry() -> EntityRegistry {
    EntityRegistry::new().with::<Item>().with::<Supplier>()
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// An active, in-stock item without supplier
pub fn item(name: &str, price: f64) -> Item {
    Item::new(name.to_string(), price, 10, true)
}

/// An item delivered by the given supplier
pub fn supplied_item(name: &str, price: f64, supplier: &Supplier) -> Item {
    let mut item = item(name, price);
    item.supplier = Some(supplier.clone());
    item
}

pub fn supplier(name: &str, country: &str) -> Supplier {
    Supplier::new(name.to_string(), country.to_string())
}

/// Persist items one after the other, returning them with identifiers
pub async fn seed<S>(repository: &Repository<Item, S>, items: Vec<Item>) -> Vec<Item>
where
    S: EntityStore<Item>,
{
    let mut stored = Vec::with_capacity(items.len());
    for item in items {
        stored.push(repository.persist(item).await.unwrap());
    }
    stored
}

/// The `A(10) B(20) C(30)` catalogue
pub fn abc() -> Vec<Item> {
    vec![item("A", 10.0), item("B", 20.0), item("C", 30.0)]
}

/// `n` items, `item-1` to `item-n`, priced 1 to n
pub fn numbered(n: usize) -> Vec<Item> {
    (1..=n).map(|i| item(&format!("item-{}", i), i as f64)).collect()
}

pub fn item_names(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.name.clone()).collect()
}

/// Item names as a sorted list, for order-insensitive comparison
pub fn sorted_item_names(items: &[Item]) -> Vec<String> {
    let mut names = item_names(items);
    names.sort();
    names
}
