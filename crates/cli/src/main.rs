//! Leadline CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write a starter config file
//! - `reply`   — Draft the next reply for a conversation transcript
//! - `assess`  — Classify the outcome of a prospect's latest reply
//! - `intent`  — Detect the prospect's primary intent
//! - `score`   — Heuristic lead score for a transcript (offline)
//! - `sweep`   — Mark stale transcripts cold (offline)
//! - `doctor`  — Diagnose config and provider health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "leadline",
    about = "Leadline — LLM-driven lead qualification pipeline",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file
    Onboard,

    /// Draft the next reply for a conversation transcript (JSON file)
    Reply {
        /// Path to a conversation transcript JSON file
        transcript: PathBuf,
    },

    /// Assess whether a conversation should end, and with what outcome
    Assess {
        /// Path to a conversation transcript JSON file
        transcript: PathBuf,
    },

    /// Detect the prospect's primary intent
    Intent {
        /// Path to a conversation transcript JSON file
        transcript: PathBuf,
    },

    /// Compute the heuristic lead score for a transcript
    Score {
        /// Path to a conversation transcript JSON file
        transcript: PathBuf,
    },

    /// Mark stale transcripts in a directory as cold
    Sweep {
        /// Directory of conversation transcript JSON files
        dir: PathBuf,
    },

    /// Diagnose config and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Reply { transcript } => commands::reply::run(&transcript).await?,
        Commands::Assess { transcript } => commands::assess::run(&transcript).await?,
        Commands::Intent { transcript } => commands::intent::run(&transcript).await?,
        Commands::Score { transcript } => commands::score::run(&transcript)?,
        Commands::Sweep { dir } => commands::sweep::run(&dir)?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
