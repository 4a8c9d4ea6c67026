//! Account commands - signup, login, logout, whoami, delete-account

use anyhow::Result;
use colored::Colorize;
use wingman_core::services::LogEvent;
use wingman_core::{Error, OperationResult, Session};

use super::tutorial::show_walkthrough_if_needed;
use super::{
    confirm_destructive, get_context, get_logger, get_password_or_prompt, log_event,
    require_session,
};
use crate::output;

fn report_session(session: &Session, json: bool, greeting: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(session))?);
    } else {
        output::success(&format!("{}, {}!", greeting, session.username));
    }
    Ok(())
}

/// Account errors are expected outcomes: print them and exit non-zero
fn report_auth_error(err: Error, json: bool) -> Result<()> {
    if err.is_auth_error() {
        if json {
            let result = OperationResult::<()>::fail(err.to_string());
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            output::error(&err.to_string());
        }
        std::process::exit(1);
    }
    Err(err.into())
}

pub fn signup(username: &str, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, LogEvent::new("signup_started").with_command("signup"));

    let ctx = get_context()?;
    let password = get_password_or_prompt(password, "Choose a password")?;

    match ctx.account_service.register(username, &password) {
        Ok(session) => {
            log_event(&logger, LogEvent::new("signup_completed").with_command("signup"));
            report_session(&session, json, "Welcome to Wing Man")?;
            if !json {
                show_walkthrough_if_needed(&ctx, &session)?;
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("signup_failed").with_command("signup").with_error(e.to_string()),
            );
            report_auth_error(e, json)
        }
    }
}

pub fn login(username: &str, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, LogEvent::new("login_started").with_command("login"));

    let ctx = get_context()?;
    let password = get_password_or_prompt(password, "Password")?;

    match ctx.account_service.login(username, &password) {
        Ok(session) => {
            log_event(&logger, LogEvent::new("login_completed").with_command("login"));
            report_session(&session, json, "Welcome back")?;
            if !json {
                show_walkthrough_if_needed(&ctx, &session)?;
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("login_failed").with_command("login").with_error(e.to_string()),
            );
            report_auth_error(e, json)
        }
    }
}

pub fn logout(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let Some(session) = ctx.session()? else {
        if json {
            println!("{}", serde_json::json!({"logged_out": false}));
        } else {
            output::info("Not logged in.");
        }
        return Ok(());
    };

    ctx.account_service.logout(&session)?;
    log_event(&get_logger(), LogEvent::new("logout_completed").with_command("logout"));

    if json {
        println!("{}", serde_json::json!({"logged_out": true, "username": session.username}));
    } else {
        output::success(&format!("Logged out {}.", session.username));
    }
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.session()?;

    if json {
        let account = match &session {
            Some(s) => Some(ctx.settings_service.load(s)?),
            None => None,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "session": session,
                "account": account,
            }))?
        );
        return Ok(());
    }

    match session {
        Some(session) => {
            let account = ctx.settings_service.load(&session)?;
            println!("{} {}", "Logged in as".dimmed(), session.username.bold());
            if account.display_name != session.username {
                println!("{} {}", "Display name:".dimmed(), account.display_name);
            }
            if let Some(zip) = account.zip() {
                println!("{} {}", "Zip code:".dimmed(), zip);
            }
        }
        None => output::info("Not logged in."),
    }
    Ok(())
}

pub fn delete_account(force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let prompt = format!(
        "Permanently delete account '{}' with all profiles, dates and settings?",
        session.username
    );
    if !confirm_destructive(force, json, &prompt)? {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.account_service.delete_account(&session)?;
    log_event(
        &get_logger(),
        LogEvent::new("account_deleted").with_command("delete-account"),
    );

    if json {
        println!("{}", serde_json::json!({"deleted": session.username}));
    } else {
        output::success(&format!("Deleted account {}.", session.username));
    }
    Ok(())
}
