//! Core catalog logic for shopgraph.
//! Users, categories, and products, their repositories, and the service that
//! implements every GraphQL query and mutation.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::input::{CreateCategoryInput, CreateProductInput, CreateUserInput};
pub use model::product::{Product, ProductId};
pub use model::user::{User, UserId};
pub use model::EntityKind;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::product_repo::{CategoryLinkDelta, ProductRepository, SqliteProductRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::catalog_service::{
    CatalogError, CatalogResult, CatalogService, SqliteCatalogService,
};
pub use store::Store;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
