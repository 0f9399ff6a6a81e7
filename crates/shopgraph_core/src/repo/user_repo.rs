//! User repository contract and SQLite implementation.

use crate::model::user::{User, UserId};
use crate::model::EntityKind;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    fullname,
    email,
    password,
    phone
FROM users";

/// Repository interface for user persistence.
pub trait UserRepository {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// All users, ordered by id.
    fn find_all(&self) -> RepoResult<Vec<User>>;
    fn exists_by_id(&self, id: UserId) -> RepoResult<bool>;
    /// Deletes one user. Owned products keep existing with no owner.
    fn delete_by_id(&self, id: UserId) -> RepoResult<()>;
    /// Inserts when `user.id` is `None`, otherwise updates; returns the stored row.
    fn save(&self, user: &User) -> RepoResult<User>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        load_user(self.conn, id)
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn exists_by_id(&self, id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id,
            });
        }
        Ok(())
    }

    fn save(&self, user: &User) -> RepoResult<User> {
        let id = match user.id {
            None => {
                self.conn.execute(
                    "INSERT INTO users (fullname, email, password, phone)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        user.fullname.as_str(),
                        user.email.as_str(),
                        user.password.as_str(),
                        user.phone.as_str(),
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE users
                     SET
                        fullname = ?2,
                        email = ?3,
                        password = ?4,
                        phone = ?5
                     WHERE id = ?1;",
                    params![
                        id,
                        user.fullname.as_str(),
                        user.email.as_str(),
                        user.password.as_str(),
                        user.phone.as_str(),
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: EntityKind::User,
                        id,
                    });
                }
                id
            }
        };

        Ok(User {
            id: Some(id),
            ..user.clone()
        })
    }
}

/// Loads one user row; shared with the product repository for owner lookup.
pub(crate) fn load_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
    let user = stmt
        .query_row([id], |row| Ok(parse_user_row(row)))
        .optional()?
        .transpose()?;
    Ok(user)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: Some(row.get("id")?),
        fullname: row.get("fullname")?,
        email: row.get("email")?,
        password: row.get("password")?,
        phone: row.get("phone")?,
    })
}
