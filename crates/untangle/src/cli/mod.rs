//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for untangle using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `init`: Write a default `untangle.yaml`
//! - `sanitize`: Drop dangling dependencies and block tasks caught in cycles
//! - `extract`: Run the extraction pipeline over source text
//! - `check`: Report dependency cycles, exiting non-zero if any exist
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config`: Use a specific configuration file
//!
//! # Example
//!
//! ```bash
//! untangle sanitize tasks.json
//! cat tasks.jsonl | untangle --json sanitize
//! untangle extract notes.txt --output job.json
//! untangle check tasks.json && echo "no cycles"
//! ```

mod args;
mod execute;

use crate::config::UntangleConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

// Re-export argument structs
pub use args::{CheckArgs, ExtractArgs, InitArgs, STDIN_PATH, SanitizeArgs};

/// Untangle - sanitize extracted task graphs
///
/// Removes dependencies on tasks that do not exist and marks every task
/// caught in a dependency cycle as blocked.
#[derive(Parser, Debug)]
#[command(name = "untangle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./untangle.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default configuration file
    ///
    /// Creates `untangle.yaml` in the current directory. Refuses to overwrite
    /// an existing file unless `--force` is given.
    Init(InitArgs),

    /// Sanitize a batch of task records
    ///
    /// Reads records as a JSON array, a `{"tasks": [...]}` object, or JSON
    /// Lines. Dependencies on unknown tasks are dropped and tasks inside a
    /// dependency cycle are marked blocked.
    Sanitize(SanitizeArgs),

    /// Extract tasks from source text and sanitize them
    ///
    /// Uses the built-in line extractor: one task per non-blank line, each
    /// depending on the previous one.
    Extract(ExtractArgs),

    /// Check task records for dependency cycles
    ///
    /// Exits with status 1 when at least one cycle is found.
    Check(CheckArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<ExitCode> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => {
                execute::execute_init(args, output_mode).await?;
            }
            Some(Commands::Sanitize(args)) => {
                let config = self.load_config().await?;
                execute::execute_sanitize(&config, args, output_mode).await?;
            }
            Some(Commands::Extract(args)) => {
                let config = self.load_config().await?;
                execute::execute_extract(&config, args, output_mode).await?;
            }
            Some(Commands::Check(args)) => {
                let config = self.load_config().await?;
                if execute::execute_check(&config, args, output_mode).await? {
                    return Ok(ExitCode::FAILURE);
                }
            }
            None => {
                println!("Untangle task graph sanitizer");
                println!("Use --help for more information");
            }
        }

        Ok(ExitCode::SUCCESS)
    }

    /// Load the configuration selected by `--config`, or the default file.
    async fn load_config(&self) -> Result<UntangleConfig> {
        let current_dir = std::env::current_dir()?;
        let config = UntangleConfig::resolve(self.config.as_deref(), &current_dir).await?;
        Ok(config)
    }
}
