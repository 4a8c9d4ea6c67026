//! Date commands - the calendar of planned dates

use std::collections::HashMap;

use anyhow::Result;
use chrono::Local;
use clap::Subcommand;
use colored::Colorize;
use wingman_core::services::LogEvent;
use wingman_core::{DateDraft, PlannedDate};

use super::profile::resolve_profile;
use super::{get_context, get_logger, log_event, require_session};
use crate::output;

#[derive(Subcommand)]
pub enum DateCommands {
    /// List upcoming and past dates
    List {
        /// Only show upcoming dates
        #[arg(long)]
        upcoming: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a date
    Add {
        /// What you're doing
        title: String,
        /// When, as YYYY-MM-DDTHH:MM (or YYYY-MM-DD)
        #[arg(long)]
        when: String,
        /// Who with (profile id, id prefix or name)
        #[arg(long)]
        with: Option<String>,
        /// Where
        #[arg(long, default_value = "")]
        location: String,
        /// Notes
        #[arg(long, default_value = "")]
        notes: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a date
    Remove {
        /// Date id (or unique id prefix)
        id: String,
    },
}

fn add_rows(
    table: &mut comfy_table::Table,
    dates: &[PlannedDate],
    names: &HashMap<String, String>,
) {
    for d in dates {
        let who = names
            .get(&d.person_id)
            .cloned()
            .unwrap_or_else(|| {
                if d.person_id.is_empty() {
                    String::new()
                } else {
                    "(removed)".to_string()
                }
            });
        table.add_row(vec![
            d.id.chars().take(8).collect::<String>(),
            d.date.replace('T', " "),
            d.title.clone(),
            who,
            d.location.clone(),
        ]);
    }
}

pub fn run(command: DateCommands) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    match command {
        DateCommands::List { upcoming, json } => {
            let now = Local::now().naive_local();
            let next = ctx.planner_service.upcoming(Some(&session), now)?;
            let past = if upcoming {
                Vec::new()
            } else {
                ctx.planner_service.past(Some(&session), now)?
            };

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "upcoming": next,
                        "past": past,
                    }))?
                );
                return Ok(());
            }

            if next.is_empty() && past.is_empty() {
                println!("No dates planned. Add one with `wm date add` or get ideas with `wm plan`.");
                return Ok(());
            }

            let names: HashMap<String, String> = ctx
                .profile_service
                .list(Some(&session))?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect();

            println!("{}", "Upcoming".bold());
            if next.is_empty() {
                println!("  {}", "Nothing scheduled.".dimmed());
            } else {
                let mut table = output::create_table();
                table.set_header(vec!["ID", "When", "Title", "With", "Where"]);
                add_rows(&mut table, &next, &names);
                println!("{}", table);
            }

            if !past.is_empty() {
                println!();
                println!("{}", "Past".bold());
                let mut table = output::create_table();
                table.set_header(vec!["ID", "When", "Title", "With", "Where"]);
                add_rows(&mut table, &past, &names);
                println!("{}", table);
            }
        }
        DateCommands::Add {
            title,
            when,
            with,
            location,
            notes,
            json,
        } => {
            let person_id = match with {
                Some(key) => resolve_profile(&ctx, &session, &key)?.id,
                None => String::new(),
            };
            let draft = DateDraft {
                title,
                person_id,
                date: when,
                location,
                notes,
            };

            let date = ctx.planner_service.add(Some(&session), draft)?;
            log_event(&get_logger(), LogEvent::new("date_added").with_command("date add"));

            if json {
                println!("{}", serde_json::to_string_pretty(&date)?);
            } else {
                output::success(&format!(
                    "Planned '{}' for {}",
                    date.title,
                    date.date.replace('T', " ")
                ));
            }
        }
        DateCommands::Remove { id } => {
            let dates = ctx.planner_service.list(Some(&session))?;
            let matches: Vec<&PlannedDate> = dates
                .iter()
                .filter(|d| d.id.starts_with(id.trim()))
                .collect();
            let target = match matches.as_slice() {
                [one] => one.id.clone(),
                [] => anyhow::bail!("No date matches '{}'. See `wm date list`.", id),
                _ => anyhow::bail!("'{}' matches {} dates; use the full id.", id, matches.len()),
            };

            let removed = ctx.planner_service.remove(Some(&session), &target)?;
            output::success(&format!("Removed '{}'", removed.title));
        }
    }
    Ok(())
}
