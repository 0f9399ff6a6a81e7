//! Category entity.

use crate::model::input::CreateCategoryInput;
use serde::{Deserialize, Serialize};

/// Storage-assigned category identifier.
pub type CategoryId = i64;

/// Product grouping with an ordered list of image references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    /// Image references in caller-supplied order.
    pub images: Vec<String>,
}

impl Category {
    /// Builds an unsaved category from mutation input.
    pub fn from_input(input: &CreateCategoryInput) -> Self {
        Self {
            id: None,
            name: input.name.clone(),
            images: input.images.clone(),
        }
    }

    /// Overwrites name and images from `input`, keeping `id`.
    pub fn apply(&mut self, input: &CreateCategoryInput) {
        self.name.clone_from(&input.name);
        self.images.clone_from(&input.images);
    }
}
