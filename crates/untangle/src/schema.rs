//! Record boundary: coercion of untrusted JSON into [`TaskRecord`]s.
//!
//! Extractor output is loosely typed. This module accepts it in the shapes
//! extractors actually produce (a JSON array, an object with a `tasks` array,
//! or JSON Lines), checks each record against the minimal task shape, and
//! either skips bad records with a [`ValidationWarning`] (lenient mode) or
//! fails on the first one (strict mode).
//!
//! # Example
//!
//! ```
//! use untangle::schema::{parse_records, validate_records};
//!
//! let text = r#"[
//!     {"id": "t1", "description": "Ship it", "priority": "high", "status": "ready"},
//!     {"id": 7, "description": "bad id", "priority": "low", "status": "ready"}
//! ]"#;
//!
//! let (values, parse_warnings) = parse_records(text);
//! assert!(parse_warnings.is_empty());
//!
//! let (records, warnings) = validate_records(values, false).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(warnings.len(), 1);
//! ```

use crate::domain::{Priority, TaskId, TaskRecord, TaskStatus};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A non-fatal problem found while reading or validating records.
///
/// The offending line or record is skipped and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// A JSON Lines line could not be parsed
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser error message
        error: String,
    },

    /// A record did not have the minimal task shape
    InvalidRecord {
        /// 0-based position in the record batch
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A record repeated an ID already seen; the first record is kept
    DuplicateId {
        /// The repeated ID
        id: String,
        /// 0-based position of the skipped record
        index: usize,
    },
}

impl ValidationWarning {
    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::InvalidRecord { .. } => "invalid_record",
            Self::DuplicateId { .. } => "duplicate_id",
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::InvalidRecord { index, reason } => {
                write!(f, "record {index}: skipped: {reason}")
            }
            Self::DuplicateId { id, index } => {
                write!(f, "record {index}: skipped duplicate id '{id}'")
            }
        }
    }
}

/// Parse raw record text into JSON values.
///
/// Accepted shapes, tried in order:
/// - a JSON array of records
/// - a JSON object with a `tasks` array
/// - a single JSON object (one record)
/// - JSON Lines, one record per line; blank lines are skipped and
///   unparseable lines become [`ValidationWarning::MalformedJson`]
pub fn parse_records(text: &str) -> (Vec<Value>, Vec<ValidationWarning>) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (Vec::new(), Vec::new());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => return (items, Vec::new()),
        Ok(Value::Object(mut object)) => {
            if let Some(Value::Array(items)) = object.get_mut("tasks") {
                return (std::mem::take(items), Vec::new());
            }
            return (vec![Value::Object(object)], Vec::new());
        }
        Ok(_) | Err(_) => {}
    }

    let mut values = Vec::new();
    let mut warnings = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_number = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => values.push(value),
            Err(e) => {
                tracing::warn!(line_number, error = %e, "Skipping malformed JSON line");
                warnings.push(ValidationWarning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
            }
        }
    }
    (values, warnings)
}

/// Coerce raw values into task records.
///
/// In lenient mode invalid records and repeated IDs are skipped with a
/// warning; the first record carrying an ID is kept. In strict mode the
/// first problem is returned as an error.
///
/// # Errors
///
/// Strict mode only:
/// - `Error::MalformedRecord` naming the index of the first invalid record
/// - `Error::DuplicateId` for the first repeated ID
pub fn validate_records(
    values: Vec<Value>,
    strict: bool,
) -> Result<(Vec<TaskRecord>, Vec<ValidationWarning>)> {
    let mut records = Vec::with_capacity(values.len());
    let mut warnings = Vec::new();
    let mut seen: HashMap<TaskId, usize> = HashMap::new();

    for (index, value) in values.into_iter().enumerate() {
        let record = match coerce_record(value) {
            Ok(record) => record,
            Err(reason) if strict => return Err(Error::MalformedRecord { index, reason }),
            Err(reason) => {
                tracing::warn!(index, %reason, "Skipping invalid task record");
                warnings.push(ValidationWarning::InvalidRecord { index, reason });
                continue;
            }
        };

        if let Some(&first) = seen.get(&record.id) {
            if strict {
                return Err(Error::DuplicateId {
                    id: record.id.to_string(),
                    first,
                    index,
                });
            }
            tracing::warn!(index, id = %record.id, first, "Skipping duplicate task id");
            warnings.push(ValidationWarning::DuplicateId {
                id: record.id.to_string(),
                index,
            });
            continue;
        }

        seen.insert(record.id.clone(), index);
        records.push(record);
    }

    Ok((records, warnings))
}

/// Check one value against the minimal task shape.
fn coerce_record(value: Value) -> std::result::Result<TaskRecord, String> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(format!("expected an object, got {}", type_name(&other))),
    };

    let id = required_string(&mut object, "id")?;
    if id.trim().is_empty() {
        return Err("field 'id' is empty".to_string());
    }
    let description = required_string(&mut object, "description")?;
    let priority: Priority = required_string(&mut object, "priority")?.parse()?;
    let status: TaskStatus = required_string(&mut object, "status")?.parse()?;

    let dependencies = match object.remove("dependencies") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(TaskId::new(s)),
                other => Err(format!(
                    "field 'dependencies' must contain strings, found {}",
                    type_name(&other)
                )),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(format!(
                "field 'dependencies' must be a list, got {}",
                type_name(&other)
            ));
        }
    };

    Ok(TaskRecord {
        id: TaskId::new(id),
        description,
        priority,
        dependencies,
        status,
    })
}

fn required_string(
    object: &mut Map<String, Value>,
    field: &str,
) -> std::result::Result<String, String> {
    match object.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!(
            "field '{field}' must be a string, got {}",
            type_name(&other)
        )),
        None => Err(format!("missing field '{field}'")),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
