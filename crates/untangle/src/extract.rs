//! Extraction boundary.
//!
//! An extraction provider turns source text into a raw, untrusted list of
//! candidate task records. Its output goes through [`crate::schema`] and
//! [`crate::sanitize`] before anyone relies on it.
//!
//! This module defines the [`TaskExtractor`] trait, a deterministic
//! [`LineExtractor`] used for local runs and tests, and
//! [`recover_task_array`] for pulling a JSON task array out of free-form
//! model output.

use crate::config::ExtractorConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Dependency ID the line extractor appends to the first task when
/// `hallucinate_dependency` is enabled. It never names a real task.
pub const HALLUCINATED_DEPENDENCY: &str = "unknown_task_id";

/// A source of raw candidate tasks.
///
/// Implementations may return records of any shape; validation happens
/// downstream.
#[async_trait]
pub trait TaskExtractor: Send + Sync {
    /// Extract candidate task records from `text`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Extraction` if the provider fails.
    async fn extract(&self, text: &str) -> Result<Vec<Value>>;
}

/// Extractor that turns each non-blank line into one task.
///
/// Tasks are named `t1`, `t2`, ... and each depends on the one before it.
/// Priorities alternate `medium`, `low`. Output is fully deterministic.
#[derive(Debug, Clone)]
pub struct LineExtractor {
    config: ExtractorConfig,
}

impl LineExtractor {
    /// Create a line extractor with the given limits
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn extract_lines(&self, text: &str) -> Vec<Value> {
        let mut tasks: Vec<Value> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(self.config.max_tasks)
            .enumerate()
            .map(|(i, line)| {
                let priority = if i % 2 == 0 { "medium" } else { "low" };
                let dependencies: Vec<String> = if i > 0 {
                    vec![format!("t{i}")]
                } else {
                    Vec::new()
                };
                json!({
                    "id": format!("t{}", i + 1),
                    "description": truncate_chars(line, self.config.max_description),
                    "priority": priority,
                    "dependencies": dependencies,
                    "status": "ready",
                })
            })
            .collect();

        if self.config.hallucinate_dependency {
            if let Some(deps) = tasks
                .first_mut()
                .and_then(|task| task.get_mut("dependencies"))
                .and_then(Value::as_array_mut)
            {
                deps.push(Value::String(HALLUCINATED_DEPENDENCY.to_string()));
            }
        }

        tasks
    }
}

impl Default for LineExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

#[async_trait]
impl TaskExtractor for LineExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<Value>> {
        let tasks = self.extract_lines(text);
        tracing::debug!(tasks = tasks.len(), "Line extractor produced tasks");
        Ok(tasks)
    }
}

/// Extractor that returns a fixed set of records, whatever the input.
///
/// Useful for replaying a captured provider response.
#[derive(Debug, Clone, Default)]
pub struct StaticExtractor {
    records: Vec<Value>,
}

impl StaticExtractor {
    /// Create an extractor that always yields `records`
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    /// Create an extractor from raw model output, see [`recover_task_array`]
    pub fn from_model_output(output: &str) -> Self {
        Self::new(recover_task_array(output))
    }
}

#[async_trait]
impl TaskExtractor for StaticExtractor {
    async fn extract(&self, _text: &str) -> Result<Vec<Value>> {
        Ok(self.records.clone())
    }
}

/// Recover a JSON array of task records from free-form model output.
///
/// Tries, in order:
/// 1. the whole text as a JSON array
/// 2. the whole text as an object with a `tasks` array
/// 3. the text between the first `[` and the last `]`
///
/// Returns an empty list when nothing parses.
pub fn recover_task_array(output: &str) -> Vec<Value> {
    let trimmed = output.trim();

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => return items,
        Ok(Value::Object(mut object)) => {
            if let Some(Value::Array(items)) = object.get_mut("tasks") {
                return std::mem::take(items);
            }
        }
        Ok(_) | Err(_) => {}
    }

    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if start < end {
            if let Ok(Value::Array(items)) = serde_json::from_str(&trimmed[start..=end]) {
                return items;
            }
        }
    }

    tracing::warn!("Could not recover a task array from model output");
    Vec::new()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
