//! Logs command - view and manage application logs

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use wingman_core::services::{EntryPoint, LoggingService};

use super::{confirm_destructive, get_wingman_dir};
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete log entries (all of them unless --older-than-days is given)
    Clear {
        /// Only delete entries older than N days
        #[arg(long)]
        older_than_days: Option<u64>,
        /// Skip confirmation prompt (required with --json)
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn get_logging_service() -> Result<LoggingService> {
    let wingman_dir = get_wingman_dir()?;
    std::fs::create_dir_all(&wingman_dir)?;
    LoggingService::new(&wingman_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = get_logging_service()?;

    match command {
        LogsCommands::List { limit, errors, json } => {
            let entries = if errors {
                service.get_errors(limit)?
            } else {
                service.get_recent(limit)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Event", "Command", "Error"]);

            for entry in entries {
                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    entry.event,
                    entry.command.unwrap_or_default(),
                    entry.error_message.unwrap_or_default().red().to_string(),
                ]);
            }

            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let prompt = match older_than_days {
                Some(days) => format!("Delete logs older than {} days?", days),
                None => "Delete all logs?".to_string(),
            };
            if !confirm_destructive(force, json, &prompt)? {
                println!("Cancelled.");
                return Ok(());
            }

            let deleted = match older_than_days {
                Some(days) => {
                    let cutoff = Utc::now() - chrono::Duration::days(days as i64);
                    service.delete_before(cutoff.timestamp_millis())?
                }
                None => service.clear()?,
            };

            if json {
                println!("{}", serde_json::json!({"deleted": deleted}));
            } else {
                println!("Deleted {} log entries", deleted);
            }
        }
        LogsCommands::Stats { json } => {
            let total = service.count()?;
            let by_event = service.event_counts()?;
            let db_path = service.db_path();
            let size_bytes = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                let stats = serde_json::json!({
                    "total_entries": total,
                    "events": by_event,
                    "database_path": db_path,
                    "database_size_bytes": size_bytes
                });
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!("{}", "Log Statistics".bold());
            println!(
                "  {} entries, {} ({})",
                total,
                output::format_size(size_bytes),
                db_path.display()
            );
            for ec in by_event.iter().take(10) {
                let count = format!("{:>6}", ec.count);
                if ec.event.ends_with("_failed") {
                    println!("  {}  {}", count.red(), ec.event);
                } else {
                    println!("  {}  {}", count, ec.event);
                }
            }
        }
    }

    Ok(())
}
