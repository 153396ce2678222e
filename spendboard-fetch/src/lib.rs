// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # SpendBoard Fetch
//!
//! Transport layer for the SpendBoard dashboard.
//!
//! ## Backend API
//!
//! - [`client::ApiClient`] - HTTP client bound to a configurable base URL
//! - [`api::DashboardApi`] - Trait covering every backend operation
//! - [`api::HttpBackend`] - Production implementation over HTTP
//! - [`retry::RetryStrategy`] - Opt-in bounded backoff (off by default)
//!
//! ## Push Channel
//!
//! - [`push::PushSource`] - Opens a connection yielding raw text frames
//! - [`push::WebSocketSource`] - WebSocket implementation
//!
//! ## Example
//!
//! ```ignore
//! use spendboard_fetch::{ApiClient, DashboardApi, HttpBackend};
//!
//! let client = ApiClient::new("http://127.0.0.1:8000")?;
//! let backend = HttpBackend::new(client);
//! let series = backend.cost_series().await?;
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod push;
pub mod retry;

// Errors
pub use error::{ErrorKind, FetchError};

// Backend API
pub use api::{DashboardApi, Endpoint, HttpBackend};
pub use client::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use retry::RetryStrategy;

// Push channel
pub use push::{DEFAULT_PUSH_PATH, FrameStream, PushSource, WebSocketSource};
