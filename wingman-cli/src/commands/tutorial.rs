//! Tutorial commands - the first-run walkthrough

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use wingman_core::{Session, WingmanContext};

use super::{get_context, require_session};
use crate::output;

const SLIDES: &[(&str, &str)] = &[
    (
        "Your Wing Man",
        "Welcome! I'm here to help you navigate dating with confidence, creativity, and a little bit of AI magic.",
    ),
    (
        "Remember Every Detail",
        "Create profiles for the people you meet (`wm profile add`). I'll remember their likes and hobbies so you can plan better dates.",
    ),
    (
        "Never Get Stuck",
        "Don't know what to reply? Use `wm reply`. I'll suggest charming, witty, or serious responses instantly.",
    ),
    (
        "Plan Perfect Moments",
        "Use `wm plan`, `wm ideas` and `wm gifts` to generate unique ideas tailored specifically to their personality.",
    ),
    (
        "Expert Guidance",
        "From outfit checks (`wm advice`) to breaking language barriers (`wm translate`), I've got the tools you need. Let's get started!",
    ),
];

#[derive(Subcommand)]
pub enum TutorialCommands {
    /// Show whether the walkthrough has been completed
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the walkthrough again next time you log in
    Replay,
    /// Mark the walkthrough as completed
    Done,
}

fn print_walkthrough() {
    println!();
    for (i, (title, description)) in SLIDES.iter().enumerate() {
        println!("{} {}", format!("{}/{}", i + 1, SLIDES.len()).dimmed(), title.bold());
        println!("    {}", description);
    }
    println!();
}

/// Print the walkthrough once for users who have not seen it
pub fn show_walkthrough_if_needed(ctx: &WingmanContext, session: &Session) -> Result<()> {
    if ctx.tutorial_service.should_show(session)? {
        print_walkthrough();
        ctx.tutorial_service.complete(session)?;
    }
    Ok(())
}

pub fn run(command: TutorialCommands) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    match command {
        TutorialCommands::Status { json } => {
            let seen = ctx.tutorial_service.has_seen(&session)?;
            if json {
                println!("{}", serde_json::json!({"username": session.username, "seen": seen}));
            } else if seen {
                output::info("Walkthrough completed. Run `wm tutorial replay` to see it again.");
            } else {
                output::info("Walkthrough not completed yet.");
                print_walkthrough();
            }
        }
        TutorialCommands::Replay => {
            ctx.tutorial_service.replay(&session)?;
            print_walkthrough();
            output::success("The walkthrough will show again on your next login.");
        }
        TutorialCommands::Done => {
            ctx.tutorial_service.complete(&session)?;
            output::success("Walkthrough marked as completed.");
        }
    }
    Ok(())
}
