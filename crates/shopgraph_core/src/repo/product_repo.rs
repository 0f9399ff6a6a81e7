//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist product scalars, the owner reference, and category links.
//! - Provide the price-ordered, per-category, and per-owner finders.
//!
//! # Invariants
//! - `save` reconciles `product_categories` against `Product::categories` as a
//!   set difference inside one savepoint; unchanged links are left untouched.
//! - Loaded products carry their owner and categories fully materialized.

use crate::model::category::CategoryId;
use crate::model::product::{Product, ProductId};
use crate::model::user::UserId;
use crate::model::EntityKind;
use crate::repo::category_repo::load_categories_for_product;
use crate::repo::user_repo::load_user;
use crate::repo::{ensure_connection_ready, in_savepoint, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    title,
    quantity,
    description,
    price,
    user_id
FROM products";

/// Repository interface for product persistence.
pub trait ProductRepository {
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>>;
    /// All products, ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Product>>;
    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool>;
    fn delete_by_id(&self, id: ProductId) -> RepoResult<()>;
    /// Inserts when `product.id` is `None`, otherwise updates; returns the stored row.
    ///
    /// The owner and every attached category must already be saved.
    fn save(&self, product: &Product) -> RepoResult<Product>;
    /// All products ordered by ascending price, ties broken by id.
    fn find_all_by_order_by_price_asc(&self) -> RepoResult<Vec<Product>>;
    /// Products linked to `category_id`, ordered by id.
    fn find_by_category_id(&self, category_id: CategoryId) -> RepoResult<Vec<Product>>;
    /// Products owned by `user_id`, ordered by id.
    fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &["products", "product_categories", "users", "categories"],
        )?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut products = query_products(
            self.conn,
            &format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )?;
        Ok(products.pop())
    }

    fn find_all(&self) -> RepoResult<Vec<Product>> {
        query_products(
            self.conn,
            &format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"),
            [],
        )
    }

    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Product,
                id,
            });
        }
        Ok(())
    }

    fn save(&self, product: &Product) -> RepoResult<Product> {
        in_savepoint(self.conn, "product_save", || {
            let id = match product.id {
                None => {
                    self.conn.execute(
                        "INSERT INTO products (title, quantity, description, price, user_id)
                         VALUES (?1, ?2, ?3, ?4, ?5);",
                        params![
                            product.title.as_str(),
                            product.quantity,
                            product.description.as_str(),
                            product.price,
                            product.user_id(),
                        ],
                    )?;
                    self.conn.last_insert_rowid()
                }
                Some(id) => {
                    let changed = self.conn.execute(
                        "UPDATE products
                         SET
                            title = ?2,
                            quantity = ?3,
                            description = ?4,
                            price = ?5,
                            user_id = ?6
                         WHERE id = ?1;",
                        params![
                            id,
                            product.title.as_str(),
                            product.quantity,
                            product.description.as_str(),
                            product.price,
                            product.user_id(),
                        ],
                    )?;
                    if changed == 0 {
                        return Err(RepoError::NotFound {
                            entity: EntityKind::Product,
                            id,
                        });
                    }
                    id
                }
            };

            let current = load_link_ids(self.conn, id)?;
            let delta = CategoryLinkDelta::between(&current, &product.category_ids());
            if !delta.is_empty() {
                debug!(
                    "event=category_links_changed module=repo product_id={id} added={} removed={}",
                    delta.added.len(),
                    delta.removed.len()
                );
            }
            for category_id in &delta.removed {
                self.conn.execute(
                    "DELETE FROM product_categories
                     WHERE product_id = ?1 AND category_id = ?2;",
                    params![id, category_id],
                )?;
            }
            for category_id in &delta.added {
                self.conn.execute(
                    "INSERT INTO product_categories (product_id, category_id)
                     VALUES (?1, ?2);",
                    params![id, category_id],
                )?;
            }

            self.find_by_id(id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("saved product {id} missing on read-back"))
            })
        })
    }

    fn find_all_by_order_by_price_asc(&self) -> RepoResult<Vec<Product>> {
        query_products(
            self.conn,
            &format!("{PRODUCT_SELECT_SQL} ORDER BY price ASC, id ASC;"),
            [],
        )
    }

    fn find_by_category_id(&self, category_id: CategoryId) -> RepoResult<Vec<Product>> {
        query_products(
            self.conn,
            &format!(
                "{PRODUCT_SELECT_SQL}
                 WHERE EXISTS (
                    SELECT 1
                    FROM product_categories pc
                    WHERE pc.product_id = products.id
                      AND pc.category_id = ?1
                 )
                 ORDER BY id ASC;"
            ),
            [category_id],
        )
    }

    fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Product>> {
        query_products(
            self.conn,
            &format!("{PRODUCT_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"),
            [user_id],
        )
    }
}

/// Link rows to delete and insert to move a product from one category set
/// to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLinkDelta {
    /// Present in the desired set only.
    pub added: Vec<CategoryId>,
    /// Present in the current set only.
    pub removed: Vec<CategoryId>,
}

impl CategoryLinkDelta {
    pub fn between(current: &BTreeSet<CategoryId>, desired: &BTreeSet<CategoryId>) -> Self {
        Self {
            added: desired.difference(current).copied().collect(),
            removed: current.difference(desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

fn load_link_ids(conn: &Connection, product_id: ProductId) -> RepoResult<BTreeSet<CategoryId>> {
    let mut stmt =
        conn.prepare("SELECT category_id FROM product_categories WHERE product_id = ?1;")?;
    let mut rows = stmt.query([product_id])?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        ids.insert(row.get(0)?);
    }
    Ok(ids)
}

fn query_products(
    conn: &Connection,
    sql: &str,
    bind: impl rusqlite::Params,
) -> RepoResult<Vec<Product>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut products = Vec::new();
    while let Some(row) = rows.next()? {
        products.push(parse_product_row(conn, row)?);
    }
    Ok(products)
}

fn parse_product_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;
    let user = match row.get::<_, Option<UserId>>("user_id")? {
        Some(user_id) => Some(load_user(conn, user_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "product {id} references missing user {user_id} in products.user_id"
            ))
        })?),
        None => None,
    };

    Ok(Product {
        id: Some(id),
        title: row.get("title")?,
        quantity: row.get("quantity")?,
        description: row.get("description")?,
        price: row.get("price")?,
        user,
        categories: load_categories_for_product(conn, id)?,
    })
}
