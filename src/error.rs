//! Error handling for the index snapshot pipeline
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for snapshot operations
///
/// The only fatal condition with a designated type is a source page
/// without a symbol-bearing table; everything else propagates as an
/// anyhow error with context, or degrades to an absent value.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("no table with a Symbol column found at {url}")]
    NoMatchingTable { url: String },
}

/// Result type alias for snapshot operations
pub type Result<T> = anyhow::Result<T>;
