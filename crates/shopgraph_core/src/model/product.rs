//! Product entity.
//!
//! # Invariants
//! - `user` is only ever set to a user that existed when the product was
//!   written.
//! - `categories` holds each category at most once, ordered by id.

use crate::model::category::{Category, CategoryId};
use crate::model::input::CreateProductInput;
use crate::model::user::{User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Storage-assigned product identifier.
pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub title: String,
    pub quantity: i32,
    pub description: String,
    pub price: f64,
    /// Owning user; `None` until a resolvable owner is assigned.
    pub user: Option<User>,
    pub categories: Vec<Category>,
}

impl Product {
    /// Builds an unsaved, unowned, uncategorized product from mutation input.
    ///
    /// Associations are resolved by the catalog service, not here.
    pub fn from_input(input: &CreateProductInput) -> Self {
        let mut product = Self {
            id: None,
            title: String::new(),
            quantity: 0,
            description: String::new(),
            price: 0.0,
            user: None,
            categories: Vec::new(),
        };
        product.apply_scalars(input);
        product
    }

    /// Overwrites title, quantity, description, and price from `input`.
    pub fn apply_scalars(&mut self, input: &CreateProductInput) {
        self.title.clone_from(&input.title);
        self.quantity = input.quantity;
        self.description.clone_from(&input.desc);
        self.price = input.price;
    }

    /// Ids of the attached categories that have been saved.
    pub fn category_ids(&self) -> BTreeSet<CategoryId> {
        self.categories
            .iter()
            .filter_map(|category| category.id)
            .collect()
    }

    /// Id of the owning user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().and_then(|user| user.id)
    }
}
