//! clipgate
//!
//! A command-line pipeline that turns long-form source video into short
//! vertical clips: validated fetch, focus-aware crop, sanitized burned-in
//! captions, and background music, all composed into one ffmpeg run.
//!
//! # Usage
//!
//! ```bash
//! clipgate process --input "https://www.youtube.com/watch?v=ID" \
//!     --output clip.mp4 --start 60 --end 90 --transcript words.json
//! clipgate validate --url "https://youtu.be/ID"
//! clipgate plan --input clip.mp4 --output final.mp4 --crop 1080x1920 --json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clipgate::cli::{commands, Cli, Commands};

/// Main entry point for the clipgate CLI
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command {
        Commands::Process(args) => {
            info!("Executing process command");
            commands::execute_process_command(args, config_path.as_deref())?;
        }
        Commands::Validate(args) => {
            commands::execute_validate_command(args, config_path.as_deref())?;
        }
        Commands::Plan(args) => {
            commands::execute_plan_command(args, config_path.as_deref())?;
        }
    }

    Ok(())
}
