//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Placeholder path meaning "read from standard input"
pub const STDIN_PATH: &str = "-";

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `sanitize` command
#[derive(Parser, Debug, Clone)]
pub struct SanitizeArgs {
    /// Task records to sanitize (JSON array, `{"tasks": [...]}`, or JSON Lines)
    ///
    /// Use `-` to read from standard input.
    #[arg(default_value = STDIN_PATH)]
    pub input: PathBuf,

    /// Fail on malformed or duplicate records instead of skipping them
    ///
    /// Overrides the `strict` setting from the configuration file.
    #[arg(long)]
    pub strict: bool,

    /// Collapse cycles that are rotations of each other
    #[arg(long)]
    pub dedup_cycles: bool,
}

/// Arguments for the `extract` command
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// Source text to extract tasks from
    ///
    /// Use `-` to read from standard input.
    #[arg(default_value = STDIN_PATH)]
    pub input: PathBuf,

    /// Also write the job result as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Task records to check for dependency cycles
    ///
    /// Use `-` to read from standard input.
    #[arg(default_value = STDIN_PATH)]
    pub input: PathBuf,
}

pub(crate) fn is_stdin(path: &std::path::Path) -> bool {
    path.as_os_str() == STDIN_PATH
}
