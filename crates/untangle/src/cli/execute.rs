//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;

use super::args::{CheckArgs, ExtractArgs, InitArgs, SanitizeArgs, is_stdin};
use crate::config::UntangleConfig;
use crate::domain::SanitizeReport;
use crate::output::{self, OutputMode};
use crate::pipeline::Pipeline;
use crate::sanitize::{dedup_cycles, sanitize};
use crate::schema::{ValidationWarning, parse_records, validate_records};

/// Execute the init command
pub async fn execute_init(args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let path = crate::config::init(&current_dir, args.force).await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "config_file": path.display().to_string(),
            }))?;
        }
        OutputMode::Text => {
            if !args.quiet {
                output::print_message(&format!("Wrote default configuration to {}", path.display()))?;
            }
        }
    }

    Ok(())
}

/// Execute the sanitize command
pub async fn execute_sanitize(
    config: &UntangleConfig,
    args: &SanitizeArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let text = read_input(&args.input).await?;
    let (report, warnings) = sanitize_text(
        &text,
        config.strict || args.strict,
        config.dedup_cycles || args.dedup_cycles,
    )?;

    output::print_report(&report, &warnings, output_mode)?;
    Ok(())
}

/// Execute the extract command
pub async fn execute_extract(
    config: &UntangleConfig,
    args: &ExtractArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let text = read_input(&args.input).await?;
    let result = Pipeline::from_config(config).run(&text).await?;

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&result)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write job result to {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Wrote job result");
    }

    match output_mode {
        OutputMode::Json => output::print_json(&result)?,
        OutputMode::Text => {
            output::print_message(&format!("Source {}", result.source_hash))?;
            let report = SanitizeReport {
                tasks: result.tasks,
                cycles: result.cycles,
            };
            output::print_report(&report, &result.warnings, output_mode)?;
        }
    }

    Ok(())
}

/// Execute the check command.
///
/// Returns `true` when at least one dependency cycle was found.
pub async fn execute_check(
    config: &UntangleConfig,
    args: &CheckArgs,
    output_mode: OutputMode,
) -> Result<bool> {
    let text = read_input(&args.input).await?;
    let (report, _) = sanitize_text(&text, config.strict, config.dedup_cycles)?;

    output::print_cycles(&report.cycles, output_mode)?;
    Ok(report.has_cycles())
}

/// Parse, validate and sanitize raw record text.
fn sanitize_text(
    text: &str,
    strict: bool,
    dedup: bool,
) -> Result<(SanitizeReport, Vec<ValidationWarning>)> {
    let (values, mut warnings) = parse_records(text);
    if strict {
        if let Some(first) = warnings.first() {
            anyhow::bail!("Invalid input: {}", first);
        }
    }

    let (records, skipped) = validate_records(values, strict)?;
    warnings.extend(skipped);

    let mut report = sanitize(records);
    if dedup {
        report.cycles = dedup_cycles(report.cycles);
    }
    Ok((report, warnings))
}

/// Read a whole input file, or standard input for `-`.
async fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read standard input")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}
