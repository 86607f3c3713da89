//! Per-entity filters and named queries

use crate::entities::{Product, User, UserRole};
use dao::prelude::*;

/// Users by exact email and, optionally, role
#[derive(Debug, Default)]
pub struct UserFilter {
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub options: FilterOptions,
}

impl Filter<User> for UserFilter {
    fn predicate(&self, cb: &CriteriaBuilder, root: &Root) -> DaoResult<Option<Predicate>> {
        Ok(cb.and([
            cb.equals(root, "email", self.email.as_deref())?,
            cb.equals(root, "role", self.role.map(|role| role.as_str()))?,
        ]))
    }

    fn options(&self) -> &FilterOptions {
        &self.options
    }
}

/// Admin accounts registered under the given email
pub async fn find_admin_with_user_name<S>(
    users: &Repository<User, S>,
    user_name: &str,
) -> DaoResult<Vec<User>>
where
    S: EntityStore<User>,
{
    let filter = UserFilter {
        email: Some(user_name.to_string()),
        role: Some(UserRole::Admin),
        ..Default::default()
    };
    users.get(Some(&filter)).await
}

/// Catalogue search: every criterion is optional
#[derive(Debug, Default)]
pub struct ProductSearch {
    pub text: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub department: Option<String>,
    pub options: FilterOptions,
}

impl Filter<Product> for ProductSearch {
    fn predicate(&self, cb: &CriteriaBuilder, root: &Root) -> DaoResult<Option<Predicate>> {
        Ok(cb.and([
            cb.like_ignore_case(root, "name", self.text.as_deref())?,
            cb.greater_than_or_equal(root, "price", self.min_price)?,
            cb.less_than_or_equal(root, "price", self.max_price)?,
            cb.equals_ignore_case(root, "category.parent.name", self.department.as_deref())?,
        ]))
    }

    fn options(&self) -> &FilterOptions {
        &self.options
    }
}
