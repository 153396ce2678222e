//! Core error types for `SpendBoard`.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for `SpendBoard` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Date range whose start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Invalid data from API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Calculator input outside the accepted domain.
    #[error("Invalid estimator input {field}: {value}")]
    InvalidInput {
        /// Name of the offending input.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
