//! Chart builder error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building chart series
#[derive(Error, Debug)]
pub enum ChartError {
    /// An epoch timestamp (or a month offset from it) has no calendar representation
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// A record's serialized line-item list could not be decoded
    #[error("Malformed line items in record {record}: {source}")]
    LineItems {
        record: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Record file could not be read
    #[error("Failed to read records from {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    /// Record file is not a JSON array of records
    #[error("Failed to parse records from {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Result type alias for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
