//! Error types for untangle operations.
//!
//! Graph anomalies (dangling dependencies, cycles, self-loops) are never
//! errors; they are repaired in place and reported as data. Only boundary
//! violations in strict mode and I/O around the core surface here.

use std::io;
use thiserror::Error;

/// The error type for untangle operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record does not have the minimal task shape (strict mode).
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord {
        /// Zero-based position of the record in the input batch
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Two records share an ID (strict mode).
    #[error("Duplicate task id '{id}' at index {index} (first seen at index {first})")]
    DuplicateId {
        /// The repeated ID
        id: String,
        /// Index of the first record carrying the ID
        first: usize,
        /// Index of the offending record
        index: usize,
    },

    /// Source text was empty after trimming.
    #[error("Source text is empty")]
    EmptySource,

    /// The extraction provider failed.
    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// A specialized Result type for untangle operations.
pub type Result<T> = std::result::Result<T, Error>;
