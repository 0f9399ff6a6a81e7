//! Shared catalog store and unit-of-work boundary.
//!
//! # Responsibility
//! - Own the single SQLite connection used by a running service.
//! - Hand out a `SqliteCatalogService` per call, for reads or inside a
//!   transaction for writes.
//!
//! # Invariants
//! - Calls are serialized on the connection mutex.
//! - `write` commits only when the operation returns `Ok`; any error (or
//!   panic) drops the transaction, which rolls back every statement.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::repo::RepoError;
use crate::service::catalog_service::SqliteCatalogService;
use log::{error, info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::fmt::Display;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Thread-safe owner of the catalog connection.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens an empty in-memory catalog.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs a read-only operation against the catalog.
    pub fn read<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&SqliteCatalogService<'_>) -> Result<T, E>,
    {
        let conn = self.lock();
        let service = SqliteCatalogService::sqlite(&conn)?;
        operation(&service)
    }

    /// Runs a mutation as one unit of work.
    ///
    /// `name` only labels log events.
    pub fn write<T, E, F>(&self, name: &'static str, operation: F) -> Result<T, E>
    where
        E: From<RepoError> + Display,
        F: FnOnce(&SqliteCatalogService<'_>) -> Result<T, E>,
    {
        let started_at = Instant::now();
        let mut conn = self.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;

        let outcome = SqliteCatalogService::sqlite(&tx)
            .map_err(E::from)
            .and_then(|service| operation(&service));

        match outcome {
            Ok(value) => {
                if let Err(err) = tx.commit() {
                    error!(
                        "event=catalog_write module=store status=error op={name} duration_ms={} error_code=commit_failed error={err}",
                        started_at.elapsed().as_millis()
                    );
                    return Err(RepoError::from(err).into());
                }
                info!(
                    "event=catalog_write module=store status=ok op={name} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event=catalog_write module=store status=rollback op={name} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-write already rolled its transaction back, so the
        // connection behind a poisoned lock is still consistent.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
