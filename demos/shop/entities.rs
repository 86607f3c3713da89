//! Shop entities
//!
//! Relations are stored as the related record's id and loaded when read,
//! so dotted paths like `"category.parent.name"` always see the current
//! category.

use chrono::{DateTime, Utc};
use dao::impl_entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Customer,
}

impl UserRole {
    /// The stored form, as compared by filters
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Customer => "CUSTOMER",
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Paid,
    Shipped,
}

impl_entity!(
    User,
    "user",
    "users",
    {
        email: String => String,
        password_hash: String => String,
        password_salt: String => String,
        role: UserRole => String,
        name: String => String,
    }
);

impl_entity!(
    Category,
    "category",
    "categories",
    {
        name: String => String,
    },
    relations {
        parent: Option<Box<Category>> => Category,
    }
);

impl_entity!(
    Product,
    "product",
    "product",
    {
        name: String => String,
        description: String => String,
        price: f64 => Float,
        inventory: i64 => Integer,
    },
    relations {
        category: Option<Category> => Category,
    }
);

impl_entity!(
    OrderItem,
    "order_item",
    "order_item",
    {
        price: f64 => Float,
    },
    relations {
        product: Option<Product> => Product,
    }
);

// Never registered with the store: repositories for it are refused
impl_entity!(
    Order,
    "order",
    "orders",
    {
        order_date: DateTime<Utc> => DateTime,
        status: OrderStatus => String,
    },
    relations {
        user: Option<User> => User,
    }
);
