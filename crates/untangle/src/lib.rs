//! Untangle - a sanitizer for extracted task graphs.
//!
//! Task lists produced by a language model are untrusted: they may reference
//! tasks that do not exist, or depend on each other in a circle. This crate
//! repairs such lists before they are acted on. See [`sanitize`] for the core
//! operation and [`pipeline`] for the end-to-end extraction job.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod sanitize;
pub mod schema;

// Public CLI module (needed by binary)
pub mod cli;
