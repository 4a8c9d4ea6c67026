//! Profile commands - people you're getting to know

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use wingman_core::services::LogEvent;
use wingman_core::{PersonProfile, ProfileDraft, Session, WingmanContext};

use super::{confirm_destructive, get_context, get_logger, log_event, require_session};
use crate::output;

#[derive(Args, Default)]
pub struct ProfileFields {
    /// Short description of them
    #[arg(long)]
    pub description: Option<String>,
    /// Things they like
    #[arg(long)]
    pub likes: Option<String>,
    /// Things they dislike
    #[arg(long)]
    pub dislikes: Option<String>,
    /// Hobbies
    #[arg(long)]
    pub hobbies: Option<String>,
    /// Occupation
    #[arg(long)]
    pub occupation: Option<String>,
    /// Private notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Avatar image URL
    #[arg(long)]
    pub avatar: Option<String>,
    /// Their zip code
    #[arg(long)]
    pub zip: Option<String>,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List saved profiles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one profile
    Show {
        /// Profile id (or unique id prefix, or name)
        profile: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a profile
    Add {
        /// Their name
        name: String,
        #[command(flatten)]
        fields: ProfileFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a profile; only the given fields change
    Edit {
        /// Profile id (or unique id prefix, or name)
        profile: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ProfileFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a profile (planned dates with them are kept)
    Remove {
        /// Profile id (or unique id prefix, or name)
        profile: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Find a profile by exact id, unique id prefix, or case-insensitive name
pub fn resolve_profile(
    ctx: &WingmanContext,
    session: &Session,
    key: &str,
) -> Result<PersonProfile> {
    let profiles = ctx.profile_service.list(Some(session))?;
    let key = key.trim();

    if let Some(p) = profiles.iter().find(|p| p.id == key) {
        return Ok(p.clone());
    }

    let matches: Vec<&PersonProfile> = profiles
        .iter()
        .filter(|p| p.id.starts_with(key) || p.name.eq_ignore_ascii_case(key))
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => anyhow::bail!("No profile matches '{}'. See `wm profile list`.", key),
        _ => anyhow::bail!("'{}' matches {} profiles; use the full id.", key, matches.len()),
    }
}

fn apply_fields(profile: &mut PersonProfile, fields: ProfileFields) {
    let ProfileFields {
        description,
        likes,
        dislikes,
        hobbies,
        occupation,
        notes,
        avatar,
        zip,
    } = fields;
    if let Some(v) = description {
        profile.description = v;
    }
    if let Some(v) = likes {
        profile.likes = v;
    }
    if let Some(v) = dislikes {
        profile.dislikes = v;
    }
    if let Some(v) = hobbies {
        profile.hobbies = v;
    }
    if let Some(v) = occupation {
        profile.occupation = v;
    }
    if let Some(v) = notes {
        profile.notes = v;
    }
    if let Some(v) = avatar {
        profile.avatar_url = v;
    }
    if let Some(v) = zip {
        let v = v.trim().to_string();
        profile.zip_code = (!v.is_empty()).then_some(v);
    }
}

fn print_profile(profile: &PersonProfile) {
    println!("{}", profile.name.bold());
    println!("  {} {}", "id:".dimmed(), profile.id);
    let rows = [
        ("Occupation", profile.occupation.as_str()),
        ("Description", profile.description.as_str()),
        ("Likes", profile.likes.as_str()),
        ("Dislikes", profile.dislikes.as_str()),
        ("Hobbies", profile.hobbies.as_str()),
        ("Zip code", profile.zip().unwrap_or("")),
        ("Notes", profile.notes.as_str()),
        ("Avatar", profile.avatar_url.as_str()),
    ];
    for (label, value) in rows {
        if !value.trim().is_empty() {
            println!("  {} {}", format!("{}:", label).dimmed(), value);
        }
    }
}

pub fn run(command: ProfileCommands) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    match command {
        ProfileCommands::List { json } => {
            let profiles = ctx.profile_service.list(Some(&session))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profiles)?);
                return Ok(());
            }
            if profiles.is_empty() {
                println!("No profiles yet. Add one with `wm profile add <name>`.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Occupation", "Likes", "Zip"]);
            for p in &profiles {
                table.add_row(vec![
                    p.id.chars().take(8).collect::<String>(),
                    p.name.clone(),
                    p.occupation.clone(),
                    p.likes.clone(),
                    p.zip().unwrap_or("").to_string(),
                ]);
            }
            println!("{}", table);
        }
        ProfileCommands::Show { profile, json } => {
            let profile = resolve_profile(&ctx, &session, &profile)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                print_profile(&profile);
            }
        }
        ProfileCommands::Add { name, fields, json } => {
            let mut draft = ProfileDraft::named(name);
            draft.avatar_url = fields.avatar.unwrap_or_default();
            draft.description = fields.description.unwrap_or_default();
            draft.likes = fields.likes.unwrap_or_default();
            draft.dislikes = fields.dislikes.unwrap_or_default();
            draft.hobbies = fields.hobbies.unwrap_or_default();
            draft.occupation = fields.occupation.unwrap_or_default();
            draft.notes = fields.notes.unwrap_or_default();
            draft.zip_code = fields.zip;

            let profile = ctx.profile_service.add(Some(&session), draft)?;
            log_event(&get_logger(), LogEvent::new("profile_added").with_command("profile add"));

            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                output::success(&format!("Added {} ({})", profile.name, profile.id));
            }
        }
        ProfileCommands::Edit {
            profile,
            name,
            fields,
            json,
        } => {
            let mut profile = resolve_profile(&ctx, &session, &profile)?;
            if let Some(name) = name {
                profile.name = name.trim().to_string();
            }
            apply_fields(&mut profile, fields);

            let profile = ctx.profile_service.update(Some(&session), profile)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                output::success(&format!("Updated {}", profile.name));
            }
        }
        ProfileCommands::Remove { profile, force } => {
            let profile = resolve_profile(&ctx, &session, &profile)?;
            let prompt = format!("Remove profile '{}'?", profile.name);
            if !confirm_destructive(force, false, &prompt)? {
                println!("Cancelled.");
                return Ok(());
            }

            ctx.profile_service.remove(Some(&session), &profile.id)?;
            log_event(
                &get_logger(),
                LogEvent::new("profile_removed").with_command("profile remove"),
            );
            output::success(&format!("Removed {}", profile.name));
        }
    }
    Ok(())
}
