//! Settings commands - your own display name, avatar and zip code

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, get_wingman_dir, require_session};
use crate::output;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show your settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change your settings
    Set {
        /// Name used to greet you
        #[arg(long)]
        display_name: Option<String>,
        /// Avatar image URL (or data URL under 800KB)
        #[arg(long)]
        avatar: Option<String>,
        /// Your zip code, used for local suggestions
        #[arg(long)]
        zip: Option<String>,
        /// Gemini API key, stored in settings.json
        #[arg(long)]
        api_key: Option<String>,
    },
}

pub fn run(command: SettingsCommands) -> Result<()> {
    let mut ctx = get_context()?;
    let session = require_session(&ctx)?;

    match command {
        SettingsCommands::Show { json } => {
            let account = ctx.settings_service.load(&session)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&account)?);
                return Ok(());
            }
            println!("{}", "Account Settings".bold());
            println!("  {} {}", "Username:".dimmed(), account.username);
            println!("  {} {}", "Display name:".dimmed(), account.greeting_name());
            println!("  {} {}", "Zip code:".dimmed(), account.zip().unwrap_or("-"));
            let avatar = if account.avatar_url.starts_with("data:") {
                "(uploaded image)"
            } else if account.avatar_url.is_empty() {
                "-"
            } else {
                account.avatar_url.as_str()
            };
            println!("  {} {}", "Avatar:".dimmed(), avatar);
        }
        SettingsCommands::Set {
            display_name,
            avatar,
            zip,
            api_key,
        } => {
            if [&display_name, &avatar, &zip, &api_key].iter().all(|v| v.is_none()) {
                anyhow::bail!(
                    "Nothing to change. Pass --display-name, --avatar, --zip or --api-key."
                );
            }

            if let Some(key) = api_key {
                let key = key.trim();
                if key.is_empty() {
                    anyhow::bail!("API key cannot be empty.");
                }
                ctx.config.api_key = Some(key.to_string());
                ctx.config.save(&get_wingman_dir()?)?;
                output::success("API key saved.");
            }

            if display_name.is_none() && avatar.is_none() && zip.is_none() {
                return Ok(());
            }

            let mut account = ctx.settings_service.load(&session)?;
            if let Some(name) = display_name {
                account.display_name = name.trim().to_string();
            }
            if let Some(url) = avatar {
                account.avatar_url = url.trim().to_string();
            }
            if let Some(zip) = zip {
                account.zip_code = zip.trim().to_string();
            }

            ctx.settings_service.save(&session, &account)?;
            output::success("Settings saved.");
        }
    }
    Ok(())
}
