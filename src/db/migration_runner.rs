use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

const BACKUPS_KEPT: usize = 5;

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

impl Migration {
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sql.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn new(version: u32, name: &'static str, sql: &'static str) -> Self {
        Self { version, name, sql }
    }
}

fn sqlite_failure(message: String) -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(1), Some(message))
}

pub struct MigrationRunner {
    migrations: Vec<Migration>,
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationRunner {
    pub fn new() -> Self {
        Self {
            migrations: vec![
                Migration::new(0, "bootstrap", include_str!("migrations/000_bootstrap.sql")),
                Migration::new(1, "journal", include_str!("migrations/001_journal.sql")),
                Migration::new(
                    2,
                    "profiles_and_settings",
                    include_str!("migrations/002_profiles_and_settings.sql"),
                ),
            ],
        }
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Apply every migration newer than the recorded version. Databases that
    /// already hold a schema are backed up next to `db_path` first.
    pub fn run_pending_migrations(&self, conn: &Connection, db_path: &str) -> Result<usize> {
        if !self.has_schema_migrations_table(conn)? {
            log::info!("Fresh database - creating migration table");
            self.apply_migration(conn, &self.migrations[0])?;
        }

        let current_version = self.get_current_version(conn)?.unwrap_or(0);
        let pending: Vec<&Migration> = self
            .migrations
            .iter()
            .filter(|m| m.version > current_version)
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        log::info!("Found {} pending migrations", pending.len());

        let backup_path = if current_version > 0 && db_path != ":memory:" {
            let target_version = self.latest_version();
            let path = self.create_backup(db_path, target_version)?;
            log::info!("Backup created: {}", path.display());
            Some(path)
        } else {
            None
        };

        let mut applied = 0;
        for migration in pending {
            if let Err(e) = self.apply_migration(conn, migration) {
                log::error!("Migration {} failed: {}", migration.version, e);
                if let Some(path) = &backup_path {
                    log::error!("Backup available at: {}", path.display());
                }
                return Err(e);
            }
            applied += 1;
        }

        Ok(applied)
    }

    fn apply_migration(&self, conn: &Connection, migration: &Migration) -> Result<()> {
        let start = Instant::now();
        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(migration.sql)?;

        let execution_time = start.elapsed().as_millis() as i64;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, notes)
             VALUES (?, ?, ?, ?, ?, NULL)",
            params![
                migration.version,
                migration.name,
                Utc::now().timestamp(),
                migration.checksum(),
                execution_time
            ],
        )?;

        tx.commit()?;

        log::info!(
            "Applied migration {} ({}) in {}ms",
            migration.version,
            migration.name,
            execution_time
        );
        Ok(())
    }

    /// Fail if an applied migration's SQL changed after it ran.
    pub fn verify_migrations(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(
            "SELECT version, name, checksum FROM schema_migrations WHERE checksum IS NOT NULL ORDER BY version",
        )?;

        let applied: Vec<(u32, String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>>>()?;

        for (version, name, stored_checksum) in applied {
            let Some(migration) = self.migrations.iter().find(|m| m.version == version) else {
                continue;
            };
            if stored_checksum != migration.checksum() {
                log::error!(
                    "Checksum mismatch for migration {} ({}): expected {}, found {}",
                    version,
                    name,
                    migration.checksum(),
                    stored_checksum
                );
                return Err(sqlite_failure(format!(
                    "Migration {} ({}) was modified after it was applied",
                    version, name
                )));
            }
        }

        Ok(())
    }

    pub fn get_current_version(&self, conn: &Connection) -> Result<Option<u32>> {
        if !self.has_schema_migrations_table(conn)? {
            return Ok(None);
        }

        let version: Option<Option<u32>> = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))
            .optional()?;

        Ok(version.flatten())
    }

    fn create_backup(&self, db_path: &str, target_version: u32) -> Result<PathBuf> {
        let db_path_buf = PathBuf::from(db_path);
        let db_dir = db_path_buf
            .parent()
            .ok_or_else(|| rusqlite::Error::InvalidPath(db_path_buf.clone()))?;
        let backup_dir = db_dir.join("backups");

        fs::create_dir_all(&backup_dir)
            .map_err(|e| sqlite_failure(format!("Failed to create backup directory: {}", e)))?;

        let backup_name = format!("pre_migration_v{}_{}.db", target_version, Utc::now().timestamp());
        let backup_path = backup_dir.join(backup_name);

        let src = Connection::open(db_path)?;
        let mut dst = Connection::open(&backup_path)?;
        {
            let backup = rusqlite::backup::Backup::new(&src, &mut dst)?;
            backup.run_to_completion(5, std::time::Duration::from_millis(250), None)?;
        }

        let integrity: String = dst.pragma_query_value(None, "integrity_check", |row| row.get(0))?;
        if integrity != "ok" {
            return Err(sqlite_failure(format!("Backup integrity check failed: {}", integrity)));
        }

        self.cleanup_old_backups(&backup_dir);
        Ok(backup_path)
    }

    fn cleanup_old_backups(&self, backup_dir: &Path) {
        let entries = match fs::read_dir(backup_dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to read backup directory: {}", e);
                return;
            }
        };

        let mut backups: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|s| s.starts_with("pre_migration_") && s.ends_with(".db"))
                    .unwrap_or(false)
            })
            .collect();

        // Oldest first
        backups.sort_by_key(|entry| {
            entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH)
        });

        if backups.len() > BACKUPS_KEPT {
            for entry in backups.iter().take(backups.len() - BACKUPS_KEPT) {
                if let Err(e) = fs::remove_file(entry.path()) {
                    log::warn!("Failed to delete old backup: {}", e);
                }
            }
        }
    }

    fn has_schema_migrations_table(&self, conn: &Connection) -> Result<bool> {
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_migrations'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
