//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub mod color;

use crate::domain::{Cycle, SanitizeReport, TaskRecord};
use crate::schema::ValidationWarning;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success, warning};

use color::{arrow, bold, colored_status_icon, colorize_id, colorize_priority, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Indent of wrapped description lines under a task header.
const DESCRIPTION_INDENT: &str = "    ";

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `UNTANGLE_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `UNTANGLE_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `UNTANGLE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let max_width = match env::var("UNTANGLE_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => match s.parse() {
                Ok(width) if width > 0 => width,
                _ => {
                    tracing::warn!(
                        env_var = "UNTANGLE_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match env::var("UNTANGLE_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "UNTANGLE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("UNTANGLE_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// JSON shape of a sanitize report with its boundary warnings.
#[derive(Serialize)]
struct ReportJson<'a> {
    tasks: &'a [TaskRecord],
    cycles: &'a [Cycle],
    warnings: &'a [ValidationWarning],
}

/// Print a sanitize report in the specified format
pub fn print_report(
    report: &SanitizeReport,
    warnings: &[ValidationWarning],
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let width = get_terminal_width().min(config.max_width);
            write_report_text(&mut handle, report, warnings, width, &config)
        }
        OutputMode::Json => write_json(
            &mut handle,
            &ReportJson {
                tasks: &report.tasks,
                cycles: &report.cycles,
                warnings,
            },
        ),
    }
}

/// Print only the cycles of a report in the specified format
pub fn print_cycles(cycles: &[Cycle], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => write_cycles_text(&mut handle, cycles, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, &serde_json::json!({ "cycles": cycles })),
    }
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", msg)
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{}", json)
}

// ============================================================================
// Text Formatting
// ============================================================================

pub(crate) fn write_report_text<W: Write>(
    w: &mut W,
    report: &SanitizeReport,
    warnings: &[ValidationWarning],
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if report.tasks.is_empty() {
        writeln!(w, "No tasks found.")?;
    } else {
        let blocked = report.blocked().count();
        writeln!(
            w,
            "{} ({} ready, {} blocked)",
            bold(&format!("{} task(s)", report.tasks.len()), config),
            report.tasks.len() - blocked,
            blocked
        )?;
        writeln!(w)?;
        for task in &report.tasks {
            write_task_text(w, task, width, config)?;
        }
    }

    writeln!(w)?;
    write_cycles_text(w, &report.cycles, config)?;

    if !warnings.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            color::warning(&format!("Skipped {} record(s):", warnings.len()), config)
        )?;
        for warning in warnings {
            writeln!(w, "  {}", dimmed(&warning.to_string(), config))?;
        }
    }

    Ok(())
}

fn write_task_text<W: Write>(
    w: &mut W,
    task: &TaskRecord,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}  {}",
        colored_status_icon(task.status, config),
        colorize_id(task.id.as_str(), config),
        colorize_priority(task.priority, config),
    )?;

    for line in wrap_text(&task.description, width.saturating_sub(DESCRIPTION_INDENT.len())) {
        writeln!(w, "{DESCRIPTION_INDENT}{line}")?;
    }

    if !task.dependencies.is_empty() {
        let deps: Vec<String> = task
            .dependencies
            .iter()
            .map(|d| colorize_id(d.as_str(), config))
            .collect();
        writeln!(
            w,
            "{DESCRIPTION_INDENT}{} {}",
            dimmed("depends on:", config),
            deps.join(", ")
        )?;
    }

    Ok(())
}

pub(crate) fn write_cycles_text<W: Write>(
    w: &mut W,
    cycles: &[Cycle],
    config: &OutputConfig,
) -> io::Result<()> {
    if cycles.is_empty() {
        writeln!(w, "{}", color::success("No dependency cycles.", config))?;
        return Ok(());
    }

    writeln!(
        w,
        "{}",
        color::error(&format!("Found {} dependency cycle(s):", cycles.len()), config)
    )?;
    let sep = format!(" {} ", arrow(config));
    for cycle in cycles {
        let ids: Vec<String> = cycle
            .ids()
            .iter()
            .map(|id| colorize_id(id.as_str(), config))
            .collect();
        writeln!(w, "  {}", ids.join(&sep))?;
    }
    Ok(())
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .flat_map(|line| {
            textwrap::wrap(line, max_width)
                .into_iter()
                .map(|s| s.into_owned())
                .collect::<Vec<_>>()
        })
        .collect()
}
