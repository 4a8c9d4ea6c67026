//! Assistant commands - reply, ideas, gifts, gift-image, advice, translate

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use wingman_core::services::prompts::{self, LANGUAGES};
use wingman_core::services::{LogEvent, LoggingService};
use wingman_core::{Message, PersonProfile, Session, WingmanContext};

use super::profile::resolve_profile;
use super::{arg_or_stdin, get_context, get_logger, log_event, require_session, spinner};
use crate::output;

/// Run one model call with a spinner and started/completed/failed events
fn with_model<T>(
    logger: &Option<LoggingService>,
    model: &str,
    command: &str,
    message: &str,
    json: bool,
    call: impl FnOnce() -> wingman_core::domain::result::Result<T>,
) -> Result<T> {
    log_event(
        logger,
        LogEvent::new("assistant_started")
            .with_command(command)
            .with_feature(command),
    );

    let pb = spinner(message, json);
    let result = call();
    pb.finish_and_clear();

    match result {
        Ok(value) => {
            log_event(
                logger,
                LogEvent::new("assistant_completed")
                    .with_command(command)
                    .with_feature(command),
            );
            Ok(value)
        }
        Err(e) => {
            log_event(
                logger,
                LogEvent::new("assistant_failed")
                    .with_command(command)
                    .with_feature(command)
                    .with_error(e.to_string())
                    .with_error_details(format!("model: {}", model)),
            );
            Err(e.into())
        }
    }
}

fn print_markdown(title: &str, body: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "markdown": body }));
    } else {
        println!("{}", title.bold());
        println!();
        println!("{}", body.trim());
    }
    Ok(())
}

/// Parse `Me: ...` / `Them: ...` lines; a line without a prefix continues the previous message
pub fn parse_conversation(text: &str) -> Result<Vec<Message>> {
    let mut messages: Vec<Message> = Vec::new();
    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let id = messages.len() as i64 + 1;
        match Message::parse_line(id, line) {
            Some(message) => messages.push(message),
            None => match messages.last_mut() {
                Some(last) => {
                    last.text.push('\n');
                    last.text.push_str(line.trim());
                }
                None => anyhow::bail!(
                    "Line {}: expected 'Me: ...' or 'Them: ...', got '{}'",
                    n + 1,
                    line.trim()
                ),
            },
        }
    }
    Ok(messages)
}

fn profile_and_zip(
    ctx: &WingmanContext,
    session: &Session,
    key: &str,
    zip: Option<String>,
) -> Result<(PersonProfile, Option<String>)> {
    let profile = resolve_profile(ctx, session, key)?;
    let zip = match zip {
        Some(z) => Some(z),
        None => ctx.settings_service.load(session)?.zip().map(str::to_string),
    };
    Ok((profile, zip))
}

pub fn reply(conversation: Option<String>, file: Option<PathBuf>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    require_session(&ctx)?;

    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => arg_or_stdin(conversation, "conversation")?,
    };
    let messages = parse_conversation(&text)?;

    let assistant = ctx.assistant()?;
    let suggestion = with_model(
        &logger,
        assistant.model_name(),
        "reply",
        "Thinking of something charming...",
        json,
        || assistant.suggest_reply(&messages),
    )?;
    print_markdown("Suggested replies", &suggestion, json)
}

pub fn ideas(profile: &str, zip: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let session = require_session(&ctx)?;
    let (profile, zip) = profile_and_zip(&ctx, &session, profile, zip)?;

    let assistant = ctx.assistant()?;
    let ideas = with_model(
        &logger,
        assistant.model_name(),
        "ideas",
        "Brainstorming dates...",
        json,
        || assistant.date_ideas(&profile, zip.as_deref()),
    )?;
    print_markdown(&format!("Date ideas for {}", profile.name), &ideas, json)
}

pub fn gifts(profile: &str, zip: Option<String>, image: Option<PathBuf>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let session = require_session(&ctx)?;
    let (profile, zip) = profile_and_zip(&ctx, &session, profile, zip)?;

    let assistant = ctx.assistant()?;
    let ideas = with_model(
        &logger,
        assistant.model_name(),
        "gifts",
        "Shopping around...",
        json,
        || assistant.gift_ideas(&profile, zip.as_deref()),
    )?;
    let image_prompt = prompts::extract_image_prompt(&ideas);

    if json {
        let saved = match (&image, &image_prompt) {
            (Some(out), Some(p)) => Some(render_image(&logger, &ctx, p, out, true)?),
            _ => None,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "markdown": ideas,
                "image_prompt": image_prompt,
                "image_path": saved,
            }))?
        );
        return Ok(());
    }

    print_markdown(&format!("Gift ideas for {}", profile.name), &ideas, false)?;
    match (image, image_prompt) {
        (Some(out), Some(p)) => {
            println!();
            let path = render_image(&logger, &ctx, &p, &out, false)?;
            output::success(&format!("Design saved to {}", path.display()));
        }
        (Some(_), None) => output::warning(
            "No image prompt found in the ideas, so no design was generated.",
        ),
        (None, Some(_)) => {
            println!();
            output::info("Turn the image prompt into a design with `wm gift-image \"<prompt>\" --out design.png`.");
        }
        (None, None) => {}
    }
    Ok(())
}

fn render_image(
    logger: &Option<LoggingService>,
    ctx: &WingmanContext,
    prompt: &str,
    out: &Path,
    json: bool,
) -> Result<PathBuf> {
    let assistant = ctx.assistant()?;
    let image = with_model(
        logger,
        assistant.model_name(),
        "gift-image",
        "Designing...",
        json,
        || assistant.gift_image(prompt),
    )?;

    let path = if out.extension().is_some() {
        out.to_path_buf()
    } else {
        out.with_extension(image.extension())
    };
    std::fs::write(&path, &image.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

pub fn gift_image(prompt: Option<String>, out: &Path, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    require_session(&ctx)?;

    let prompt = arg_or_stdin(prompt, "image prompt")?;
    let path = render_image(&logger, &ctx, prompt.trim(), out, json)?;

    if json {
        println!("{}", serde_json::json!({ "image_path": path }));
    } else {
        output::success(&format!("Design saved to {}", path.display()));
    }
    Ok(())
}

pub fn advice(date_type: &str, question: Option<&str>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    require_session(&ctx)?;

    let assistant = ctx.assistant()?;
    let advice = with_model(
        &logger,
        assistant.model_name(),
        "advice",
        "Consulting the coach...",
        json,
        || assistant.dating_advice(date_type, question.unwrap_or_default()),
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
        return Ok(());
    }

    println!("{} {}", "Vibe:".magenta().bold(), advice.key_vibe.bold());
    println!();
    println!("{}", "Your question".bold());
    println!("  {}", advice.question_answer);
    println!();
    println!("{}", "Do".green().bold());
    for item in &advice.dos {
        println!("  {} {}", "+".green(), item);
    }
    println!("{}", "Don't".red().bold());
    for item in &advice.donts {
        println!("  {} {}", "-".red(), item);
    }
    println!();
    println!("{}", "Outfit".bold());
    println!("  {}", advice.outfit_suggestion.description);
    println!("  {}", advice.outfit_suggestion.reasoning.italic());
    println!();
    println!("{}", "Conversation starters".bold());
    for item in &advice.conversation_starters {
        println!("  {} {}", "?".cyan(), item);
    }
    if let Some(joke) = &advice.icebreaker_joke {
        println!();
        println!("{} {}", "Icebreaker:".bold(), joke);
    }
    Ok(())
}

pub fn translate(
    text: Option<String>,
    from: &str,
    to: &str,
    speak: Option<PathBuf>,
    list_languages: bool,
    json: bool,
) -> Result<()> {
    if list_languages {
        if json {
            let langs: Vec<_> = LANGUAGES
                .iter()
                .map(|(code, name)| serde_json::json!({"code": code, "name": name}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&langs)?);
        } else {
            for (code, name) in LANGUAGES {
                println!("  {}  {}", code.bold(), name);
            }
        }
        return Ok(());
    }

    let logger = get_logger();
    let ctx = get_context()?;
    require_session(&ctx)?;

    let text = arg_or_stdin(text, "text to translate")?;
    let assistant = ctx.assistant()?;
    let translated = with_model(
        &logger,
        assistant.model_name(),
        "translate",
        "Translating...",
        json,
        || assistant.translate(&text, from, to),
    )?;

    let audio_path = match &speak {
        Some(out) => {
            let clip = with_model(
                &logger,
                assistant.model_name(),
                "speak",
                "Recording pronunciation...",
                json,
                || assistant.speak(&translated),
            )?;
            std::fs::write(out, clip.to_wav())
                .with_context(|| format!("Failed to write {}", out.display()))?;
            Some(out.clone())
        }
        None => None,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "source": from,
                "target": to,
                "translation": translated,
                "audio_path": audio_path,
            }))?
        );
        return Ok(());
    }

    println!(
        "{} {} {}",
        prompts::language_name(from).dimmed(),
        "->".dimmed(),
        prompts::language_name(to).bold()
    );
    println!("{}", translated);
    if let Some(path) = audio_path {
        output::success(&format!("Audio saved to {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingman_core::Sender;

    #[test]
    fn test_parse_conversation() {
        let text = "Them: Hey!\n\nMe: Hi, how are you?\nstill typing\nThem: good";
        let messages = parse_conversation(text).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].sender, Sender::Them);
        assert_eq!(messages[1].text, "Hi, how are you?\nstill typing");
        assert_eq!(messages[2].id, 3);
    }

    #[test]
    fn test_parse_conversation_needs_prefix_first() {
        assert!(parse_conversation("hello there").is_err());
        assert!(parse_conversation("").unwrap().is_empty());
    }
}
