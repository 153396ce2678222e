//! Store error types.

use spendboard_core::CoreError;
use spendboard_fetch::FetchError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Domain validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Edit index outside the buffer.
    #[error("Row {index} is out of range (buffer has {len} rows)")]
    IndexOutOfBounds {
        /// Requested row.
        index: usize,
        /// Rows in the buffer.
        len: usize,
    },

    /// Field name not editable for this buffer.
    #[error("Unknown field '{field}' for {buffer} rows")]
    UnknownField {
        /// Requested field.
        field: String,
        /// Buffer kind.
        buffer: &'static str,
    },

    /// Numeric field value did not parse.
    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber {
        /// Field being set.
        field: &'static str,
        /// Raw input.
        value: String,
    },

    /// No edit session has been started.
    #[error("No edit in progress")]
    NotEditing,

    /// The dashboard has been unmounted.
    #[error("Dashboard is not mounted")]
    Unmounted,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Fetch(e) => e.is_transient(),
            StoreError::Io(_) => true,
            _ => false,
        }
    }
}
