// ABOUTME: Li-Lai-Lian CLI - send meal photos and workout notes to the AI coach
// ABOUTME: Handles single analyses, line-by-line sessions, and model diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian
//!
//! Usage:
//! ```bash
//! # Analyze a meal photo with the default profile
//! lilailian analyze --image lunch.jpg
//!
//! # Describe a workout for a muscle-gain profile
//! lilailian analyze --target 增肌 --tdee 2600 --note "深蹲 100kg 5x5"
//!
//! # Keep one profile and send several submissions from stdin
//! lilailian session --name 阿明 --body-fat 18.5
//!
//! # Check which models your API key can use
//! lilailian models
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lilailian::coaching::CoachSession;
use lilailian::config::{CoachConfig, ConfigOverrides, LogLevel};
use lilailian::constants::profile_defaults;
use lilailian::errors::AppResult;
use lilailian::llm::GeminiProvider;
use lilailian::logging::LoggingConfig;
use lilailian::models::{Target, UserProfile};

use helpers::display;

#[derive(Parser)]
#[command(
    name = "lilailian",
    version,
    about = "哩來練 Li-Lai-Lian - AI fitness coach",
    long_about = "Sends meal photos, workout screenshots and notes to a hosted multimodal model and turns the coach's reply into a structured record."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key override (defaults to GEMINI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model override (defaults to LILAILIAN_MODEL or gemini-2.5-flash)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Analyze one photo and/or note
    Analyze {
        #[command(flatten)]
        profile: ProfileArgs,

        /// What you ate or how you trained
        #[arg(long)]
        note: Option<String>,

        /// Meal photo or workout screenshot (JPEG or PNG)
        #[arg(long)]
        image: Option<PathBuf>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read submissions from stdin, one per line
    ///
    /// Plain lines are notes. `:image PATH [note]` attaches a photo.
    /// `:quit` or end of input stops the session.
    Session {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Print each outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the models your API key can use
    Models {
        /// Print the diagnosis as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Profile flags shared by `analyze` and `session`
#[derive(Args)]
struct ProfileArgs {
    /// Your name
    #[arg(long, default_value = profile_defaults::NAME)]
    name: String,

    /// Goal: 減脂 / 增肌 / 維持 (or fat-loss, muscle-gain, maintain)
    #[arg(long, default_value_t = Target::default())]
    target: Target,

    /// Total daily energy expenditure (kcal)
    #[arg(long, default_value_t = profile_defaults::TDEE)]
    tdee: u32,

    /// Body-fat percentage
    #[arg(long = "body-fat", default_value_t = profile_defaults::BODY_FAT_PCT)]
    body_fat: f64,
}

impl ProfileArgs {
    fn into_profile(self) -> AppResult<UserProfile> {
        UserProfile::new(self.name, self.target, self.tdee, self.body_fat)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_verbose(cli.verbose);
    if let Err(e) = LoggingConfig::from_env().with_level(level).init() {
        eprintln!("{e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let overrides = ConfigOverrides {
        api_key: cli.api_key,
        model: cli.model,
    };

    match cli.command {
        Command::Analyze {
            profile,
            note,
            image,
            json,
        } => {
            let profile = profile.into_profile()?;
            let session = build_session(overrides)?;
            commands::analyze::run(&session, &profile, note, image, json).await
        }
        Command::Session { profile, json } => {
            let profile = profile.into_profile()?;
            let session = build_session(overrides)?;
            commands::session::run(&session, &profile, json).await
        }
        Command::Models { json } => {
            let session = build_session(overrides)?;
            commands::models::run(&session, json).await
        }
    }
}

fn build_session(overrides: ConfigOverrides) -> AppResult<CoachSession<GeminiProvider>> {
    let config = CoachConfig::from_env_with(overrides)?;
    let provider = GeminiProvider::from_config(&config)?;
    Ok(CoachSession::from_config(provider, &config))
}
