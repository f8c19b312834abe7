//! One extraction job: source text in, sanitized task graph out.
//!
//! The pipeline wires the collaborators together:
//! extract -> validate -> sanitize -> (optional) cycle dedup. The resulting
//! [`JobResult`] is plain serializable data; storing it is the caller's job.
//!
//! # Example
//!
//! ```
//! use untangle::config::UntangleConfig;
//! use untangle::pipeline::Pipeline;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::from_config(&UntangleConfig::default());
//!     let result = pipeline.run("Draft agenda\nBook room").await?;
//!
//!     assert_eq!(result.tasks.len(), 2);
//!     assert!(result.cycles.is_empty());
//!     Ok(())
//! }
//! ```

use crate::config::UntangleConfig;
use crate::domain::{Cycle, TaskRecord};
use crate::error::{Error, Result};
use crate::extract::{LineExtractor, TaskExtractor};
use crate::sanitize::{dedup_cycles, sanitize};
use crate::schema::{ValidationWarning, validate_records};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted but not yet processed
    Pending,

    /// Finished with a result
    Completed,

    /// Finished with an error
    Failed,
}

/// Result of one pipeline run, ready to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    /// SHA-256 hex digest of the trimmed source text
    pub source_hash: String,

    /// Job status
    pub status: JobStatus,

    /// Completion timestamp (RFC 3339)
    pub created_at: String,

    /// Sanitized tasks
    pub tasks: Vec<TaskRecord>,

    /// Detected cycles
    pub cycles: Vec<Cycle>,

    /// Records skipped at the boundary
    #[serde(default, skip_deserializing)]
    pub warnings: Vec<ValidationWarning>,
}

/// Extraction pipeline.
pub struct Pipeline {
    extractor: Box<dyn TaskExtractor>,
    strict: bool,
    dedup_cycles: bool,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("extractor", &"<dyn TaskExtractor>")
            .field("strict", &self.strict)
            .field("dedup_cycles", &self.dedup_cycles)
            .finish()
    }
}

impl Pipeline {
    /// Create a pipeline around an extractor.
    pub fn new(extractor: Box<dyn TaskExtractor>) -> Self {
        Self {
            extractor,
            strict: false,
            dedup_cycles: false,
        }
    }

    /// Create a pipeline with a [`LineExtractor`] and settings from `config`.
    pub fn from_config(config: &UntangleConfig) -> Self {
        Self::new(Box::new(LineExtractor::new(config.extractor.clone())))
            .strict(config.strict)
            .dedup_cycles(config.dedup_cycles)
    }

    /// Fail on malformed or duplicate records instead of skipping them.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Collapse cycles that are rotations of each other.
    #[must_use]
    pub fn dedup_cycles(mut self, dedup: bool) -> Self {
        self.dedup_cycles = dedup;
        self
    }

    /// Run one job over `text`.
    ///
    /// # Errors
    ///
    /// - `Error::EmptySource` if `text` is blank
    /// - any error returned by the extractor
    /// - `Error::MalformedRecord` / `Error::DuplicateId` in strict mode
    pub async fn run(&self, text: &str) -> Result<JobResult> {
        let source = text.trim();
        if source.is_empty() {
            return Err(Error::EmptySource);
        }
        let source_hash = hash_source(source);
        tracing::debug!(%source_hash, "Starting extraction job");

        let raw = self.extractor.extract(source).await?;
        let (records, warnings) = validate_records(raw, self.strict)?;

        let report = sanitize(records);
        let cycles = if self.dedup_cycles {
            dedup_cycles(report.cycles)
        } else {
            report.cycles
        };

        tracing::info!(
            tasks = report.tasks.len(),
            cycles = cycles.len(),
            skipped = warnings.len(),
            "Extraction job completed"
        );

        Ok(JobResult {
            source_hash,
            status: JobStatus::Completed,
            created_at: chrono::Utc::now().to_rfc3339(),
            tasks: report.tasks,
            cycles,
            warnings,
        })
    }
}

/// SHA-256 hex digest of already-trimmed source text.
///
/// Identical transcripts hash identically, which lets a job layer return a
/// cached result instead of re-running extraction.
pub fn hash_source(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}
