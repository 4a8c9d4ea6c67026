//! Wing Man CLI - your dating assistant in the terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, assistant, date, logs, plan, profile, settings, tutorial};

/// Wing Man - your dating assistant in the terminal
#[derive(Parser)]
#[command(name = "wm", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Signup {
        /// Username (case-insensitive)
        username: String,
        /// Password (or set WINGMAN_PASSWORD; prompted otherwise)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in to an existing account
    Login {
        /// Username (case-insensitive)
        username: String,
        /// Password (or set WINGMAN_PASSWORD; prompted otherwise)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show who is logged in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete your account and everything stored for it
    DeleteAccount {
        /// Skip confirmation prompt (required with --json)
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the people you're getting to know
    Profile {
        #[command(subcommand)]
        command: profile::ProfileCommands,
    },

    /// Manage planned dates
    Date {
        #[command(subcommand)]
        command: date::DateCommands,
    },

    /// Get four concrete date options for a place and time
    Plan {
        /// When, as YYYY-MM-DDTHH:MM
        #[arg(long)]
        when: String,
        /// Zip code (defaults to yours from settings)
        #[arg(long)]
        zip: Option<String>,
        /// Who with (profile id, id prefix or name)
        #[arg(long)]
        with: Option<String>,
        /// Save option N to your calendar
        #[arg(long)]
        save: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage your account settings
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },

    /// Manage the first-run walkthrough
    Tutorial {
        #[command(subcommand)]
        command: tutorial::TutorialCommands,
    },

    /// Suggest replies for a conversation ("Me: ..." / "Them: ..." lines)
    Reply {
        /// Conversation text (reads stdin if omitted)
        conversation: Option<String>,
        /// Read the conversation from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Brainstorm date ideas for someone
    Ideas {
        /// Profile id, id prefix or name
        profile: String,
        /// Your zip code (defaults to settings)
        #[arg(long)]
        zip: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Brainstorm gift ideas for someone
    Gifts {
        /// Profile id, id prefix or name
        profile: String,
        /// Your zip code (defaults to settings)
        #[arg(long)]
        zip: Option<String>,
        /// Also render the suggested custom design to this file
        #[arg(long)]
        image: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a gift design from an image prompt
    GiftImage {
        /// Image prompt (reads stdin if omitted)
        prompt: Option<String>,
        /// Output file
        #[arg(short, long, default_value = "gift-design.png")]
        out: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get coaching for an upcoming date
    Advice {
        /// Kind of date (e.g. "First coffee date")
        #[arg(long, default_value = "First Date")]
        date_type: String,
        /// Your question (general tips if omitted)
        question: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate a phrase, optionally saving spoken audio
    Translate {
        /// Text to translate (reads stdin if omitted)
        text: Option<String>,
        /// Source language code
        #[arg(long, default_value = "en")]
        from: String,
        /// Target language code
        #[arg(long, default_value = "es")]
        to: String,
        /// Write the spoken translation to this WAV file
        #[arg(long)]
        speak: Option<PathBuf>,
        /// List supported languages
        #[arg(long)]
        languages: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Signup { username, password, json } => account::signup(&username, password, json),
        Commands::Login { username, password, json } => account::login(&username, password, json),
        Commands::Logout { json } => account::logout(json),
        Commands::Whoami { json } => account::whoami(json),
        Commands::DeleteAccount { force, json } => account::delete_account(force, json),
        Commands::Profile { command } => profile::run(command),
        Commands::Date { command } => date::run(command),
        Commands::Plan { when, zip, with, save, json } => plan::run(&when, zip, with, save, json),
        Commands::Settings { command } => settings::run(command),
        Commands::Tutorial { command } => tutorial::run(command),
        Commands::Reply { conversation, file, json } => assistant::reply(conversation, file, json),
        Commands::Ideas { profile, zip, json } => assistant::ideas(&profile, zip, json),
        Commands::Gifts { profile, zip, image, json } => {
            assistant::gifts(&profile, zip, image, json)
        }
        Commands::GiftImage { prompt, out, json } => assistant::gift_image(prompt, &out, json),
        Commands::Advice { date_type, question, json } => {
            assistant::advice(&date_type, question.as_deref(), json)
        }
        Commands::Translate { text, from, to, speak, languages, json } => {
            assistant::translate(text, &from, &to, speak, languages, json)
        }
        Commands::Logs { command } => logs::run(command),
    }
}
