//! Plan command - generate concrete date options and optionally save one

use anyhow::{Context, Result};
use colored::Colorize;
use wingman_core::domain::planned_date::parse_date_time;
use wingman_core::services::{LogEvent, PlannerService};

use super::profile::resolve_profile;
use super::{get_context, get_logger, log_event, require_session, spinner};
use crate::output;

pub fn run(
    when: &str,
    zip: Option<String>,
    with: Option<String>,
    save: Option<usize>,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let date_time = parse_date_time(when)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DDTHH:MM", when))?;
    let zip = match zip {
        Some(z) => z,
        None => ctx
            .settings_service
            .load(&session)?
            .zip()
            .map(str::to_string)
            .context("No zip code given. Pass --zip or set one with `wm settings set --zip`.")?,
    };
    let profile = match with {
        Some(key) => Some(resolve_profile(&ctx, &session, &key)?),
        None => None,
    };

    let assistant = ctx.assistant()?;
    log_event(
        &logger,
        LogEvent::new("assistant_started")
            .with_command("plan")
            .with_feature("plan_dates"),
    );

    let pb = spinner("Scouting date spots...", json);
    let result = assistant.plan_dates(&zip, when, profile.as_ref());
    pb.finish_and_clear();

    let options = match result {
        Ok(options) => options,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("assistant_failed")
                    .with_command("plan")
                    .with_feature("plan_dates")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };
    log_event(
        &logger,
        LogEvent::new("assistant_completed")
            .with_command("plan")
            .with_feature("plan_dates"),
    );

    let saved = match save {
        Some(n) => {
            let option = options
                .get(n.wrapping_sub(1))
                .with_context(|| format!("--save must be between 1 and {}", options.len()))?;
            let person_id = profile.as_ref().map(|p| p.id.as_str()).unwrap_or("");
            let draft = PlannerService::draft_from_option(option, date_time, person_id);
            Some(ctx.planner_service.add(Some(&session), draft)?)
        }
        None => None,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "options": options,
                "saved": saved,
            }))?
        );
        return Ok(());
    }

    for (i, option) in options.iter().enumerate() {
        println!("{} {}", format!("{}.", i + 1).magenta().bold(), option.title.bold());
        println!("   {} {}", "Where:".dimmed(), option.location);
        println!("   {}", option.description);
        println!("   {} {}", "Why:".dimmed(), option.reasoning.italic());
        println!();
    }

    match saved {
        Some(date) => output::success(&format!("Saved '{}' to your calendar.", date.title)),
        None => output::info("Save one with `wm plan ... --save <number>`."),
    }
    Ok(())
}
