//! Catalog use-case service.
//!
//! # Responsibility
//! - Expose every catalog query and mutation as one method each.
//! - Resolve product owner and category references before persisting.
//!
//! # Invariants
//! - Unresolvable user/category references are skipped, never reported.
//! - Updates of missing entities return `CatalogError::NotFound` and write
//!   nothing.
//! - Deletes of missing entities return `Ok(false)`.
//! - The service is storage-agnostic; atomicity across the repository calls
//!   of one mutation is provided by the caller's unit of work (`Store`).

use crate::model::category::{Category, CategoryId};
use crate::model::input::{CreateCategoryInput, CreateProductInput, CreateUserInput};
use crate::model::product::{Product, ProductId};
use crate::model::user::{User, UserId};
use crate::model::EntityKind;
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::product_repo::{ProductRepository, SqliteProductRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors from catalog mutations.
#[derive(Debug)]
pub enum CatalogError {
    /// Update target does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

/// Catalog service wired to SQLite repositories over one connection.
pub type SqliteCatalogService<'conn> = CatalogService<
    SqliteUserRepository<'conn>,
    SqliteCategoryRepository<'conn>,
    SqliteProductRepository<'conn>,
>;

/// Query/mutation handler over the three entity repositories.
pub struct CatalogService<U, C, P> {
    users: U,
    categories: C,
    products: P,
}

impl<'conn> SqliteCatalogService<'conn> {
    /// Builds SQLite repositories over `conn` (a plain connection or an open
    /// transaction) and wraps them in a service.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteUserRepository::try_new(conn)?,
            SqliteCategoryRepository::try_new(conn)?,
            SqliteProductRepository::try_new(conn)?,
        ))
    }
}

impl<U, C, P> CatalogService<U, C, P>
where
    U: UserRepository,
    C: CategoryRepository,
    P: ProductRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(users: U, categories: C, products: P) -> Self {
        Self {
            users,
            categories,
            products,
        }
    }

    /// All products, cheapest first.
    pub fn products_sorted_by_price_asc(&self) -> RepoResult<Vec<Product>> {
        self.products.find_all_by_order_by_price_asc()
    }

    /// Products attached to `category_id`; empty for unknown ids.
    pub fn products_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Product>> {
        self.products.find_by_category_id(category_id)
    }

    /// Products owned by `user_id`; empty for unknown ids.
    pub fn products_by_user(&self, user_id: UserId) -> RepoResult<Vec<Product>> {
        self.products.find_by_user_id(user_id)
    }

    pub fn users(&self) -> RepoResult<Vec<User>> {
        self.users.find_all()
    }

    pub fn categories(&self) -> RepoResult<Vec<Category>> {
        self.categories.find_all()
    }

    pub fn user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.users.find_by_id(id)
    }

    pub fn category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.categories.find_by_id(id)
    }

    pub fn product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        self.products.find_by_id(id)
    }

    pub fn create_user(&self, input: &CreateUserInput) -> RepoResult<User> {
        self.users.save(&User::from_input(input))
    }

    pub fn create_category(&self, input: &CreateCategoryInput) -> RepoResult<Category> {
        self.categories.save(&Category::from_input(input))
    }

    /// Creates a product, attaching whichever owner and categories resolve.
    ///
    /// # Contract
    /// - Missing or unknown `user_id` leaves the product unowned.
    /// - Missing `category_ids` yields an empty category set.
    pub fn create_product(&self, input: &CreateProductInput) -> RepoResult<Product> {
        let mut product = Product::from_input(input);
        product.user = self.resolve_owner(input.user_id)?;
        product.categories = self.resolve_categories(input.category_ids.as_deref())?;
        self.products.save(&product)
    }

    /// Replaces every scalar field of an existing user.
    pub fn update_user(&self, id: UserId, input: &CreateUserInput) -> CatalogResult<User> {
        let mut user = self.users.find_by_id(id)?.ok_or(CatalogError::NotFound {
            entity: EntityKind::User,
            id,
        })?;
        user.apply(input);
        Ok(self.users.save(&user)?)
    }

    /// Replaces name and images of an existing category.
    pub fn update_category(
        &self,
        id: CategoryId,
        input: &CreateCategoryInput,
    ) -> CatalogResult<Category> {
        let mut category = self
            .categories
            .find_by_id(id)?
            .ok_or(CatalogError::NotFound {
                entity: EntityKind::Category,
                id,
            })?;
        category.apply(input);
        Ok(self.categories.save(&category)?)
    }

    /// Updates an existing product.
    ///
    /// # Contract
    /// - Scalar fields are fully replaced.
    /// - The owner changes only when `user_id` resolves; otherwise the
    ///   previous owner stays.
    /// - The category set becomes exactly the resolvable ids of
    ///   `category_ids`; a missing list clears it.
    pub fn update_product(
        &self,
        id: ProductId,
        input: &CreateProductInput,
    ) -> CatalogResult<Product> {
        let mut product = self
            .products
            .find_by_id(id)?
            .ok_or(CatalogError::NotFound {
                entity: EntityKind::Product,
                id,
            })?;
        product.apply_scalars(input);
        if let Some(owner) = self.resolve_owner(input.user_id)? {
            product.user = Some(owner);
        }
        product.categories = self.resolve_categories(input.category_ids.as_deref())?;
        Ok(self.products.save(&product)?)
    }

    pub fn delete_user(&self, id: UserId) -> RepoResult<bool> {
        if !self.users.exists_by_id(id)? {
            return Ok(false);
        }
        self.users.delete_by_id(id)?;
        Ok(true)
    }

    pub fn delete_category(&self, id: CategoryId) -> RepoResult<bool> {
        if !self.categories.exists_by_id(id)? {
            return Ok(false);
        }
        self.categories.delete_by_id(id)?;
        Ok(true)
    }

    pub fn delete_product(&self, id: ProductId) -> RepoResult<bool> {
        if !self.products.exists_by_id(id)? {
            return Ok(false);
        }
        self.products.delete_by_id(id)?;
        Ok(true)
    }

    fn resolve_owner(&self, user_id: Option<UserId>) -> RepoResult<Option<User>> {
        let Some(user_id) = user_id else {
            return Ok(None);
        };
        let owner = self.users.find_by_id(user_id)?;
        if owner.is_none() {
            debug!("event=owner_link_skipped module=service user_id={user_id}");
        }
        Ok(owner)
    }

    /// Resolves ids into a duplicate-free category set ordered by id.
    fn resolve_categories(&self, ids: Option<&[CategoryId]>) -> RepoResult<Vec<Category>> {
        let mut resolved = BTreeMap::new();
        for &category_id in ids.unwrap_or_default() {
            if resolved.contains_key(&category_id) {
                continue;
            }
            match self.categories.find_by_id(category_id)? {
                Some(category) => {
                    resolved.insert(category_id, category);
                }
                None => {
                    debug!("event=category_link_skipped module=service category_id={category_id}");
                }
            }
        }
        Ok(resolved.into_values().collect())
    }
}
