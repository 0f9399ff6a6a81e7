//! User entity.

use crate::model::input::CreateUserInput;
use serde::{Deserialize, Serialize};

/// Storage-assigned user identifier.
pub type UserId = i64;

/// Account record that may own products.
///
/// Owned products are a back-reference only: they are looked up through
/// `ProductRepository::find_by_user_id`, never stored on the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<UserId>,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl User {
    /// Builds an unsaved user from mutation input.
    pub fn from_input(input: &CreateUserInput) -> Self {
        let mut user = Self {
            id: None,
            fullname: String::new(),
            email: String::new(),
            password: String::new(),
            phone: String::new(),
        };
        user.apply(input);
        user
    }

    /// Overwrites every scalar field from `input`, keeping `id`.
    pub fn apply(&mut self, input: &CreateUserInput) {
        self.fullname.clone_from(&input.fullname);
        self.email.clone_from(&input.email);
        self.password.clone_from(&input.password);
        self.phone.clone_from(&input.phone);
    }
}
