use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "forestbot")]
#[command(author, version, about = "Telegram bot that verifies Green Forest residents", long_about = None)]
pub struct Cli {
    /// Config file (.json, .toml or .yaml); environment variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling
    Run {
        /// Keep records in memory instead of Google Sheets (lost on exit)
        #[arg(long)]
        memory_store: bool,
    },

    /// Write the header row to the spreadsheet and exit
    SetupSheets,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Describes a `.env` load failure worth reporting. A missing file is not one.
pub fn env_file_problem<T>(result: &dotenvy::Result<T>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!("Failed to load .env: {}", e)),
        _ => None,
    }
}
