use rusqlite::{Connection, Result};
use std::sync::{Mutex, MutexGuard};

use crate::db::migration_runner::MigrationRunner;
use crate::error::JournalError;

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::prepare(conn, db_path)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?, ":memory:")
    }

    fn prepare(conn: Connection, db_path: &str) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        let runner = MigrationRunner::new();
        let applied = runner.run_pending_migrations(&conn, db_path)?;
        if applied > 0 {
            log::info!("Applied {} migrations", applied);
        } else {
            log::info!("Database schema is up to date");
        }

        runner.verify_migrations(&conn)?;

        if let Some(version) = runner.get_current_version(&conn)? {
            log::info!("Schema version: {}", version);
        }

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn lock(&self) -> std::result::Result<MutexGuard<'_, Connection>, JournalError> {
        self.conn
            .lock()
            .map_err(|e| JournalError::Database(format!("Connection lock poisoned: {}", e)))
    }
}
