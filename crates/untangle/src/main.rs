//! Untangle CLI binary.

use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use untangle::cli::Cli;

/// Main entry point for the untangle CLI.
///
/// Uses tokio's current_thread runtime for simplicity and lower overhead.
/// This is appropriate for CLI applications with sequential I/O-bound operations.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays clean for --json output.
    // Example: RUST_LOG=untangle=debug untangle sanitize tasks.json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("untangle=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting untangle CLI");

    let cli = Cli::parse_args();
    let code = cli.execute().await?;

    tracing::debug!("Untangle CLI completed");
    Ok(code)
}
