//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse classification used for propagation decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (connect, timeout, socket I/O).
    Transport,
    /// A response arrived but was unusable (bad status, malformed body).
    Protocol,
    /// The request was never sent because the client is misconfigured.
    Configuration,
}

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for backend and push-channel operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed before a response arrived, or the body was unreadable.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status {
        /// Path of the endpoint that failed.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// Response body did not match the expected shape.
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse {
        /// Path of the endpoint that failed.
        endpoint: String,
        /// What was wrong with it.
        message: String,
    },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] spendboard_core::CoreError),

    /// Base URL or endpoint could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Push channel transport failure.
    #[error("Push channel error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Push channel closed by the peer.
    #[error("Push channel closed")]
    ChannelClosed,
}

impl FetchError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Http(e) if e.is_decode() || e.is_status() => ErrorKind::Protocol,
            FetchError::Http(e) if e.is_builder() => ErrorKind::Configuration,
            FetchError::Http(_) | FetchError::WebSocket(_) | FetchError::ChannelClosed => {
                ErrorKind::Transport
            }
            FetchError::Status { .. }
            | FetchError::InvalidResponse { .. }
            | FetchError::Json(_)
            | FetchError::Core(_) => ErrorKind::Protocol,
            FetchError::InvalidUrl(_) => ErrorKind::Configuration,
        }
    }

    /// Returns true if a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_connect() || e.is_timeout(),
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::WebSocket(_) | FetchError::ChannelClosed => true,
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
