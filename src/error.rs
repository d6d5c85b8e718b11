//! Error types for decoding and summarizing transaction logs.

use thiserror::Error;

/// Result type alias for log operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors that can occur while decoding or summarizing a log.
#[derive(Error, Debug)]
pub enum LogError {
    /// Failed to open or read the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV report writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input ended before the fixed-size header was complete
    #[error("Truncated header: expected {expected} bytes, only {available} available")]
    TruncatedHeader { expected: usize, available: usize },

    /// Input ended where the fixed part of a record was expected
    #[error(
        "Truncated record {index} at offset {offset}: expected {expected} bytes, only {available} available"
    )]
    TruncatedRecord {
        index: u32,
        offset: u64,
        expected: usize,
        available: usize,
    },

    /// A monetary record is missing its trailing amount
    #[error(
        "Truncated amount for record {index} at offset {offset}: expected {expected} bytes, only {available} available"
    )]
    TruncatedAmount {
        index: u32,
        offset: u64,
        expected: usize,
        available: usize,
    },

    /// Record kind outside the known set, rejected by policy
    #[error("Unrecognized record kind {kind} for record {index} at offset {offset}")]
    UnrecognizedKind { kind: u8, index: u32, offset: u64 },

    /// Wrong number of command-line arguments
    #[error("Usage: txlog-summary <log-file>")]
    Usage,

    /// Environment setting could not be parsed
    #[error("Invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },
}
