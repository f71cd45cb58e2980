//! Error types for the patient-cleaner library.

use std::path::PathBuf;
use thiserror::Error;

use crate::logging::redact_value;

/// Main error type for cleaning operations.
#[derive(Debug, Error)]
pub enum CleanerError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to clean.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stage needs a column the table does not have.
    #[error("Column '{column}' not found (required by {stage})")]
    MissingColumn { column: String, stage: String },

    /// A date value did not match the expected pattern.
    ///
    /// `row` is the 0-based record index. Messages show it 1-based and
    /// redact the value unless data logging is enabled.
    #[error(
        "Malformed date at row {}: '{}' does not match '{}'",
        .row + 1,
        redact_value(.value),
        .expected
    )]
    MalformedDate {
        row: usize,
        value: String,
        expected: String,
    },

    /// An address value could not be split into its components.
    #[error("Malformed address at row {}: {}", .row + 1, .reason)]
    MalformedAddress { row: usize, reason: String },

    /// A phone number could not be canonicalized.
    #[error("Malformed phone number at row {}: {}", .row + 1, .reason)]
    MalformedPhone { row: usize, reason: String },
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanerError>;
