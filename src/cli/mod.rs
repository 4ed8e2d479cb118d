//! CLI module for clipgate
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{PlanArgs, ProcessArgs, ValidateArgs};

/// clipgate
///
/// Safe media pipeline: validates source URLs against a host allow-list,
/// samples frames to find the focus point, generates sanitized captions,
/// and composes every transform into a single ffmpeg invocation.
#[derive(Parser)]
#[command(name = "clipgate")]
#[command(about = "Safe media ingestion and transform pipeline")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, analyze, and transform a clip end to end
    Process(args::ProcessArgs),
    /// Check a URL against the scheme and host allow-list
    Validate(args::ValidateArgs),
    /// Compose transform stages and print the single resulting invocation
    Plan(args::PlanArgs),
}
