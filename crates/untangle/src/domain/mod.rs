//! Domain types for extracted task graphs.
//!
//! This module contains the strict record types the sanitizer works on.
//! Loosely-typed input is coerced into these types by [`crate::schema`]
//! before it reaches [`crate::sanitize`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a task within one extraction batch
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new task ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An actionable task extracted from source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Identifier, unique within the batch
    pub id: TaskId,

    /// Free-text description (passed through untouched)
    pub description: String,

    /// Priority (passed through untouched)
    pub priority: Priority,

    /// Tasks that must complete before this one is ready
    #[serde(default)]
    pub dependencies: Vec<TaskId>,

    /// Readiness status
    pub status: TaskStatus,
}

impl TaskRecord {
    /// Create a ready, medium-priority task with the given dependencies.
    pub fn new<I, D>(id: impl Into<TaskId>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TaskId>,
    {
        Self {
            id: id.into(),
            description: String::new(),
            priority: Priority::Medium,
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            status: TaskStatus::Ready,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the task is blocked
    pub fn is_blocked(&self) -> bool {
        self.status == TaskStatus::Blocked
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task can be picked up
    Ready,

    /// Task is waiting on something, or sits inside a dependency cycle
    Blocked,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.pad("ready"),
            Self::Blocked => f.pad("blocked"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(Self::Ready),
            "blocked" => Ok(Self::Blocked),
            other => Err(format!(
                "invalid status '{other}' (expected 'ready' or 'blocked')"
            )),
        }
    }
}

/// Priority level of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority
    Low,

    /// Medium priority
    Medium,

    /// High priority
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.pad("low"),
            Self::Medium => f.pad("medium"),
            Self::High => f.pad("high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "invalid priority '{other}' (expected 'low', 'medium' or 'high')"
            )),
        }
    }
}

/// A closed walk through the dependency graph, e.g. `[a, b, a]`.
///
/// The first and last IDs are always equal. Serializes as a plain JSON array
/// of IDs so it can be stored alongside a job result without translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(pub Vec<TaskId>);

impl Cycle {
    /// IDs along the walk, including the closing repeat
    pub fn ids(&self) -> &[TaskId] {
        &self.0
    }

    /// Number of distinct steps in the walk (a self-loop has length 1)
    pub fn len(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Whether the walk is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the given task participates in this cycle
    pub fn contains(&self, id: &TaskId) -> bool {
        self.0.contains(id)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in &self.0 {
            if !first {
                write!(f, " -> ")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        Ok(())
    }
}

/// Output of one sanitization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    /// Corrected tasks, same length and order as the input
    pub tasks: Vec<TaskRecord>,

    /// Cycles in discovery order
    pub cycles: Vec<Cycle>,
}

impl SanitizeReport {
    /// Whether any cycle was found
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Look up a task by ID (first match)
    pub fn task(&self, id: &TaskId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Tasks that are ready to work on
    pub fn ready(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.iter().filter(|t| !t.is_blocked())
    }

    /// Tasks that are blocked
    pub fn blocked(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.iter().filter(|t| t.is_blocked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Blocked).unwrap();
        assert_eq!(json, r#""blocked""#);
    }

    #[test]
    fn cycle_serializes_as_plain_array() {
        let cycle = Cycle(vec!["a".into(), "b".into(), "a".into()]);
        let json = serde_json::to_string(&cycle).unwrap();
        assert_eq!(json, r#"["a","b","a"]"#);
    }

    #[test]
    fn cycle_display_uses_arrows() {
        let cycle = Cycle(vec!["a".into(), "a".into()]);
        assert_eq!(cycle.to_string(), "a -> a");
        assert_eq!(cycle.len(), 1);
    }

    #[test]
    fn record_defaults_missing_dependencies() {
        let json = r#"{"id":"t1","description":"x","priority":"high","status":"ready"}"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert!(record.dependencies.is_empty());
        assert_eq!(record.priority, Priority::High);
    }

    #[test]
    fn priority_from_str_rejects_unknown() {
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
    }
}
