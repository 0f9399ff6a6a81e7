//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted records (`User`, `Category`, `Product`).
//! - Define the transient input shapes carried by create/update mutations.
//!
//! # Invariants
//! - An entity with `id == None` has never been saved.
//! - Ids are assigned by storage and never reused for another row.

pub mod category;
pub mod input;
pub mod product;
pub mod user;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Names the persisted record type an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Category,
    Product,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Category => "category",
            Self::Product => "product",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
