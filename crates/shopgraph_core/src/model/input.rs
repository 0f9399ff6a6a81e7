//! Mutation input shapes.
//!
//! These are transport-neutral: the GraphQL layer decodes its arguments into
//! them. They are never persisted directly.

use crate::model::category::CategoryId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Fields for creating or fully replacing a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Fields for creating or fully replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub images: Vec<String>,
}

/// Fields for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateProductInput {
    pub title: String,
    pub quantity: i32,
    pub desc: String,
    pub price: f64,
    /// Owner to attach. Omitted and unresolvable ids behave the same.
    pub user_id: Option<UserId>,
    /// Categories to attach. Unresolvable ids are skipped.
    pub category_ids: Option<Vec<CategoryId>>,
}
