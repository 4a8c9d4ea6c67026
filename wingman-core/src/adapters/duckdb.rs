//! DuckDB key-value store implementation
//!
//! Stands in for browser local storage: one table of JSON text keyed by
//! string, living in `wingman.duckdb` inside the data directory.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use duckdb::{params, Connection};

use crate::domain::result::Error;
use crate::ports::KeyValueStore;
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

fn storage_error(e: impl std::fmt::Display) -> Error {
    Error::storage(e.to_string())
}

/// Run `open` until it succeeds, backing off while the file is locked
fn retry_on_lock<T>(mut open: impl FnMut() -> Result<T>) -> Result<T> {
    let mut last_error = None;

    for attempt in 0..MAX_RETRIES {
        match open() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let err_msg = e.to_string();
                if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                    let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                    eprintln!(
                        "[wingman] Store busy, retrying in {}ms (attempt {}/{}): {}",
                        delay.as_millis(),
                        attempt + 1,
                        MAX_RETRIES,
                        err_msg
                    );
                    thread::sleep(delay);
                    last_error = Some(e);
                    continue;
                }
                return Err(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| anyhow!("Failed to open store after {} retries", MAX_RETRIES)))
}

/// DuckDB-backed key-value store
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbStore {
    /// Open (or create) the store at `db_path`
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which can occur when a second `wm` process is still holding the file.
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = retry_on_lock(|| Self::try_open_connection(db_path))?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path.to_path_buf()),
        })
    }

    /// Open a store that lives only as long as this value
    pub fn in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // IMPORTANT: Disable extension autoloading to avoid macOS code signing issues
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    /// Ensure the store schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connection().map_err(|e| anyhow!("{}", e))?;
        MigrationService::new(&conn).run_pending()?;
        Ok(())
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Number of stored keys
    pub fn len(&self) -> crate::domain::result::Result<usize> {
        let conn = self.connection()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM sys_kv_store", [], |row| row.get(0))
            .map_err(storage_error)?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> crate::domain::result::Result<bool> {
        Ok(self.len()? == 0)
    }

    fn connection(&self) -> crate::domain::result::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl KeyValueStore for DuckDbStore {
    fn get(&self, key: &str) -> crate::domain::result::Result<Option<String>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare("SELECT store_value FROM sys_kv_store WHERE store_key = ?")
            .map_err(storage_error)?;
        let mut rows = stmt
            .query_map([key], |row| row.get::<_, String>(0))
            .map_err(storage_error)?;

        match rows.next() {
            Some(value) => Ok(Some(value.map_err(storage_error)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> crate::domain::result::Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO sys_kv_store (store_key, store_value, updated_at)
             VALUES (?, ?, current_timestamp)
             ON CONFLICT (store_key) DO UPDATE SET
                store_value = EXCLUDED.store_value,
                updated_at = EXCLUDED.updated_at",
            params![key, value],
        )
        .map_err(storage_error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> crate::domain::result::Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM sys_kv_store WHERE store_key = ?", [key])
            .map_err(storage_error)?;
        Ok(())
    }

    fn keys(&self) -> crate::domain::result::Result<Vec<String>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare("SELECT store_key FROM sys_kv_store ORDER BY store_key")
            .map_err(storage_error)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(storage_error)?;

        let mut result = Vec::new();
        for key in keys {
            result.push(key.map_err(storage_error)?);
        }
        Ok(result)
    }
}
