//! CLI command implementations

pub mod account;
pub mod assistant;
pub mod date;
pub mod logs;
pub mod plan;
pub mod profile;
pub mod settings;
pub mod tutorial;

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};
use wingman_core::services::{EntryPoint, LogEvent, LoggingService};
use wingman_core::{Session, WingmanContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let wingman_dir = get_wingman_dir().ok()?;
    std::fs::create_dir_all(&wingman_dir).ok()?;
    LoggingService::new(&wingman_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the Wing Man directory from environment or default
pub fn get_wingman_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("WINGMAN_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".wingman"))
        .context("Could not find home directory; set WINGMAN_DIR")
}

/// Open the Wing Man context, creating the directory on first use
pub fn get_context() -> Result<WingmanContext> {
    let wingman_dir = get_wingman_dir()?;

    std::fs::create_dir_all(&wingman_dir)
        .with_context(|| format!("Failed to create Wing Man directory: {:?}", wingman_dir))?;

    WingmanContext::new(&wingman_dir).context("Failed to open Wing Man data")
}

/// The signed-in user, or an error telling them to log in
pub fn require_session(ctx: &WingmanContext) -> Result<Session> {
    ctx.session()?
        .context("Not logged in. Run `wm login` or `wm signup` first.")
}

/// Get password from --password flag, WINGMAN_PASSWORD env var, or prompt
pub fn get_password_or_prompt(password_flag: Option<String>, prompt: &str) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("WINGMAN_PASSWORD") {
        return Ok(p);
    }

    let p = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    Ok(p)
}

/// Ask before an irreversible change; JSON output never prompts, so it needs --force
pub fn confirm_destructive(force: bool, json: bool, prompt: &str) -> Result<bool> {
    if force {
        return Ok(true);
    }
    if json {
        anyhow::bail!("Refusing to continue without --force when --json is set.");
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Use the argument if given, otherwise read piped stdin
pub fn arg_or_stdin(arg: Option<String>, what: &str) -> Result<String> {
    if let Some(value) = arg {
        return Ok(value);
    }
    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    anyhow::bail!("No {} provided. Pass it as an argument or pipe it on stdin.", what)
}

/// Spinner shown while waiting on the model; hidden for JSON output
pub fn spinner(message: &str, json: bool) -> ProgressBar {
    if json || atty::isnt(atty::Stream::Stderr) {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
