//! Logging service - structured event logging to DuckDB
//!
//! Stores events in logs.duckdb next to the store. Only event names, command
//! names, feature names and error text are recorded: never passwords,
//! profile contents, conversations or prompts.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::log_migrations::LOG_MIGRATIONS;
use crate::services::MigrationService;

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

const SELECT_COLUMNS: &str = "id, timestamp, entry_point, app_version, platform, \
     event, command, feature, error_message, error_details";

/// Current unix timestamp in milliseconds
fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a unique ID based on timestamp + counter
fn generate_id() -> u64 {
    // Lower 16 bits: counter (65536 unique IDs per millisecond)
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    ((now_ms().max(0) as u64) << 16) | counter
}

fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Where the event originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Test,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Test => "test",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Assistant feature involved (reply, ideas, gifts, advice, translate...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            feature: None,
            error_message: None,
            error_details: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A log entry as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub command: Option<String>,
    pub feature: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl LogEntry {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            entry_point: row.get(2)?,
            app_version: row.get(3)?,
            platform: row.get(4)?,
            event: row.get(5)?,
            command: row.get(6)?,
            feature: row.get(7)?,
            error_message: row.get(8)?,
            error_details: row.get(9)?,
        })
    }
}

/// Per-event totals for `wm logs stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCount {
    pub event: String,
    pub count: u64,
}

/// Service for structured event logging
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Open or create logs.duckdb in `wingman_dir` and run pending migrations
    pub fn new(
        wingman_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        let db_path = wingman_dir.join("logs.duckdb");
        let conn = Connection::open(&db_path)?;
        MigrationService::with_migrations(&conn, LOG_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Record an event, stamped with entry point, version and platform
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            r#"
            INSERT INTO sys_logs (
                id, timestamp, entry_point, app_version, platform,
                event, command, feature, error_message, error_details
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            duckdb::params![
                generate_id(),
                now_ms(),
                self.entry_point.as_str(),
                &self.app_version,
                self.platform,
                &event.event,
                &event.command,
                &event.feature,
                &event.error_message,
                &event.error_details,
            ],
        )?;
        Ok(())
    }

    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    /// Log a CLI command execution
    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    pub fn log_error(&self, event: &str, message: &str, details: Option<&str>) -> Result<()> {
        let mut log_event = LogEvent::new(event).with_error(message);
        if let Some(d) = details {
            log_event = log_event.with_error_details(d);
        }
        self.log(log_event)
    }

    /// Most recent entries first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_entries(
            &format!(
                "SELECT {} FROM sys_logs ORDER BY timestamp DESC, id DESC LIMIT ?",
                SELECT_COLUMNS
            ),
            limit,
        )
    }

    /// Most recent entries that carry an error message
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_entries(
            &format!(
                "SELECT {} FROM sys_logs WHERE error_message IS NOT NULL \
                 ORDER BY timestamp DESC, id DESC LIMIT ?",
                SELECT_COLUMNS
            ),
            limit,
        )
    }

    fn query_entries(&self, sql: &str, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([limit as i64], LogEntry::from_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Event totals, most frequent first
    pub fn event_counts(&self) -> Result<Vec<EventCount>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT event, COUNT(*) AS n FROM sys_logs GROUP BY event ORDER BY n DESC, event",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EventCount {
                event: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_logs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete logs older than the specified timestamp (unix ms)
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.connection()?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    /// Delete every entry
    pub fn clear(&self) -> Result<u64> {
        let conn = self.connection()?;
        let deleted = conn.execute("DELETE FROM sys_logs", [])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(dir: &Path) -> LoggingService {
        LoggingService::new(dir, EntryPoint::Test, "1.0.0").unwrap()
    }

    #[test]
    fn test_logging_service_creation() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        assert!(service.db_path().exists());
    }

    #[test]
    fn test_log_event() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());

        service.log_event("login_completed").unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "login_completed");
        assert_eq!(entries[0].entry_point, "test");
        assert_eq!(entries[0].app_version, "1.0.0");
    }

    #[test]
    fn test_log_with_context() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());

        service
            .log(
                LogEvent::new("assistant_completed")
                    .with_feature("translate")
                    .with_command("translate"),
            )
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries[0].feature, Some("translate".to_string()));
        assert_eq!(entries[0].command, Some("translate".to_string()));
    }

    #[test]
    fn test_log_error() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());

        service.log_command("reply").unwrap();
        service
            .log_error("reply_failed", "Failed to get reply suggestion from AI.", Some("HTTP 503"))
            .unwrap();

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "reply_failed");
        assert_eq!(errors[0].error_details, Some("HTTP 503".to_string()));
    }

    #[test]
    fn test_counts_and_clear() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());

        service.log_event("login_completed").unwrap();
        service.log_event("login_completed").unwrap();
        service.log_event("logout_completed").unwrap();
        assert_eq!(service.count().unwrap(), 3);

        let counts = service.event_counts().unwrap();
        assert_eq!(counts[0].event, "login_completed");
        assert_eq!(counts[0].count, 2);

        assert_eq!(service.delete_before(0).unwrap(), 0);
        assert_eq!(service.clear().unwrap(), 3);
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let dir = tempdir().unwrap();
        service(dir.path()).log_event("signup_completed").unwrap();
        assert_eq!(service(dir.path()).count().unwrap(), 1);
    }
}
