//! Category repository contract and SQLite implementation.
//!
//! # Invariants
//! - Image references keep caller order through `category_images.position`.
//! - `save` replaces the image list as a whole.

use crate::model::category::{Category, CategoryId};
use crate::model::product::ProductId;
use crate::model::EntityKind;
use crate::repo::{ensure_connection_ready, in_savepoint, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// All categories, ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Category>>;
    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool>;
    /// Deletes one category and detaches it from every product.
    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()>;
    /// Inserts when `category.id` is `None`, otherwise updates; returns the stored row.
    fn save(&self, category: &Category) -> RepoResult<Category>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["categories", "category_images"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        load_category(self.conn, id)
    }

    fn find_all(&self) -> RepoResult<Vec<Category>> {
        query_categories(
            self.conn,
            &format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"),
            [],
        )
    }

    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Category,
                id,
            });
        }
        Ok(())
    }

    fn save(&self, category: &Category) -> RepoResult<Category> {
        in_savepoint(self.conn, "category_save", || {
            let id = match category.id {
                None => {
                    self.conn.execute(
                        "INSERT INTO categories (name) VALUES (?1);",
                        [category.name.as_str()],
                    )?;
                    self.conn.last_insert_rowid()
                }
                Some(id) => {
                    let changed = self.conn.execute(
                        "UPDATE categories SET name = ?2 WHERE id = ?1;",
                        params![id, category.name.as_str()],
                    )?;
                    if changed == 0 {
                        return Err(RepoError::NotFound {
                            entity: EntityKind::Category,
                            id,
                        });
                    }
                    id
                }
            };

            self.conn
                .execute("DELETE FROM category_images WHERE category_id = ?1;", [id])?;
            for (position, image) in category.images.iter().enumerate() {
                self.conn.execute(
                    "INSERT INTO category_images (category_id, position, image)
                     VALUES (?1, ?2, ?3);",
                    params![id, position as i64, image.as_str()],
                )?;
            }

            Ok(Category {
                id: Some(id),
                ..category.clone()
            })
        })
    }
}

/// Loads one category with its images.
pub(crate) fn load_category(conn: &Connection, id: CategoryId) -> RepoResult<Option<Category>> {
    let mut categories =
        query_categories(conn, &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"), [id])?;
    Ok(categories.pop())
}

/// Loads the categories linked to one product, ordered by category id.
pub(crate) fn load_categories_for_product(
    conn: &Connection,
    product_id: ProductId,
) -> RepoResult<Vec<Category>> {
    query_categories(
        conn,
        "SELECT c.id, c.name
         FROM product_categories pc
         INNER JOIN categories c ON c.id = pc.category_id
         WHERE pc.product_id = ?1
         ORDER BY c.id ASC;",
        [product_id],
    )
}

fn query_categories(
    conn: &Connection,
    sql: &str,
    bind: impl rusqlite::Params,
) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(parse_category_row(conn, row)?);
    }
    Ok(categories)
}

fn parse_category_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Category> {
    let id: CategoryId = row.get("id")?;
    Ok(Category {
        id: Some(id),
        name: row.get("name")?,
        images: load_images(conn, id)?,
    })
}

fn load_images(conn: &Connection, category_id: CategoryId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT image
         FROM category_images
         WHERE category_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([category_id])?;
    let mut images = Vec::new();
    while let Some(row) = rows.next()? {
        images.push(row.get(0)?);
    }
    Ok(images)
}
