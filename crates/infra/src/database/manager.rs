//! Database connection manager backed by an r2d2 SQLite pool.

use std::path::{Path, PathBuf};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use slotbook_domain::{Result, SlotbookError};
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_SQL: &str = include_str!("schema.sql");

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Run a blocking SQLite operation on the blocking thread pool so runtime
/// worker threads stay free for request handling.
pub(crate) async fn run_blocking<T, F>(pool: &DbPool, op: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(InfraError::from)?;
        op(&conn)
    })
    .await
    .map_err(|err| SlotbookError::Internal(format!("database task failed: {err}")))?
}

/// Owns the SQLite connection pool and the schema lifecycle.
pub struct DbManager {
    pool: DbPool,
    path: PathBuf,
}

impl DbManager {
    /// Open (or create) the database at `db_path` with the given pool size.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
        });

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .build(manager)
            .map_err(InfraError::from)?;

        info!(db_path = %path.display(), max_connections = pool.max_size(), "sqlite pool initialised");

        Ok(Self { pool, path })
    }

    /// Borrow the underlying pool for repository construction.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get().map_err(InfraError::from)?)
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(InfraError::from)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire a connection and run a trivial query to verify the database
    /// is responsive.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(InfraError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DbManager::new(dir.path().join("slotbook.db"), 2).unwrap();
        manager.run_migrations().unwrap();
        manager.run_migrations().unwrap();
        manager.health_check().unwrap();
    }

    #[test]
    fn confirmed_slot_index_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DbManager::new(dir.path().join("slotbook.db"), 2).unwrap();
        manager.run_migrations().unwrap();

        let conn = manager.get_connection().unwrap();
        let insert = "INSERT INTO bookings (id, tenant_id, date, time, duration_minutes, \
                      meeting_type, client_name, client_email, status, created_at) \
                      VALUES (?1, 't1', '2025-06-24', 600, 30, 'Intro', 'Pat', 'p@e.com', ?2, 0)";
        conn.execute(insert, params!["b1", "confirmed"]).unwrap();
        assert!(conn.execute(insert, params!["b2", "confirmed"]).is_err());
        // A cancelled row in the same slot is fine.
        conn.execute(insert, params!["b3", "cancelled"]).unwrap();
    }
}
