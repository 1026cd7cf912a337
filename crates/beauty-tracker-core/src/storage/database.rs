//! SQLite connection handling.
//!
//! One [`TrackerDb`] wraps one connection. Catalog and engine operations
//! borrow it; every mutation goes through [`TrackerDb::write_tx`], which opens
//! an `IMMEDIATE` transaction so read-check-write sequences from concurrent
//! processes are serialized by SQLite's write lock.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use super::{database_path, migrations, Config};
use crate::error::{CoreError, DatabaseError};

/// SQLite database holding the catalog and every user's progress.
pub struct TrackerDb {
    conn: Connection,
}

impl TrackerDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database configured by `config` (see [`database_path`]).
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(config: &Config) -> Result<Self, CoreError> {
        let path = database_path(config)?;
        Self::open_at(&path, Duration::from_millis(config.database.busy_timeout_ms))
    }

    /// Open (and migrate) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path, busy_timeout: Duration) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(busy_timeout)?;
        tracing::debug!(path = %path.display(), "opened tracker database");
        Self::init(conn)
    }

    /// Open an in-memory database (for tests and dry runs).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, CoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Begin a write transaction holding SQLite's reserved lock.
    ///
    /// Dropping the transaction without committing rolls it back.
    ///
    /// # Errors
    /// Returns [`DatabaseError::Locked`] if another writer holds the lock past
    /// the busy timeout.
    pub fn write_tx(&self) -> Result<Transaction<'_>, CoreError> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_memory_applies_schema() {
        let db = TrackerDb::open_memory().unwrap();
        assert_eq!(
            migrations::get_schema_version(db.conn()),
            migrations::SCHEMA_VERSION
        );
        let fk: i64 = db
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn dropped_write_tx_rolls_back() {
        let db = TrackerDb::open_memory().unwrap();
        {
            let tx = db.write_tx().unwrap();
            tx.execute(
                "INSERT INTO tracker_program_templates (name, created_at) VALUES ('x', 'now')",
                [],
            )
            .unwrap();
        }
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM tracker_program_templates", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.db");
        {
            let _db = TrackerDb::open_at(&path, Duration::from_millis(100)).unwrap();
        }
        assert!(path.exists());
        // Reopening an existing file must not re-run migrations destructively.
        let _db = TrackerDb::open_at(&path, Duration::from_millis(100)).unwrap();
    }
}
