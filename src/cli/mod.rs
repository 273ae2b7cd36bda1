//! CLI command definitions for pm-settings
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve and inspect the service configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML base document to use instead of the embedded one
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dotenv file consulted for variables missing from the environment
    #[arg(short, long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Whether the process-wide resolver can be used as-is.
    pub fn uses_defaults(&self) -> bool {
        self.config.is_none() && self.env_file.is_none()
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the configuration and start logging with it (default)
    Check,

    /// Print the resolved configuration
    Show(FormatArgs),

    /// List every override variable the schema reads
    Vars(FormatArgs),
}

/// Output format selection.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}
