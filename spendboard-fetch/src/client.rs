//! HTTP client for the dashboard backend.
//!
//! Wraps `reqwest` with a configurable base URL, request tracing, optional
//! retries, and uniform status/body error mapping.

use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::retry::RetryStrategy;

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for SpendBoard.
const USER_AGENT: &str = concat!("SpendBoard/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// API Client
// ============================================================================

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: Url,
    retry_strategy: RetryStrategy,
}

impl ApiClient {
    /// Creates a client for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            base_url: parse_base_url(base_url)?,
            retry_strategy: RetryStrategy::no_retry(),
        })
    }

    /// Sets the retry strategy for this client.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// A leading `/` is treated as relative to the base, so a base of
    /// `http://host/api/` maps `/cloud-costs` to `http://host/api/cloud-costs`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Resolves a push-channel path, switching `http(s)` to `ws(s)`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for unsupported base schemes.
    pub fn push_url(&self, path: &str) -> Result<Url, FetchError> {
        let mut url = self.endpoint(path)?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(FetchError::InvalidUrl(format!(
                    "unsupported scheme for push channel: {other}"
                )));
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| FetchError::InvalidUrl(format!("cannot switch {url} to {scheme}")))?;
        Ok(url)
    }

    /// Performs a GET and decodes a JSON body.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses, and malformed bodies.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        debug!("GET request");
        let response = self
            .send_with_retry(path, || self.inner.get(url.clone()).query(query))
            .await?;
        decode_json(path, response).await
    }

    /// Performs a POST with a JSON body and decodes a JSON response.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses, and malformed bodies.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST request with JSON");
        let response = self
            .send_with_retry(path, || self.inner.post(url.clone()).json(body))
            .await?;
        decode_json(path, response).await
    }

    /// Performs a PUT with a JSON body. Only the status is inspected.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success statuses.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put_json<B>(&self, path: &str, body: &B) -> Result<(), FetchError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!("PUT request with JSON");
        self.send_with_retry(path, || self.inner.put(url.clone()).json(body))
            .await?;
        Ok(())
    }

    /// Sends a request, retrying transient failures per the retry strategy.
    async fn send_with_retry<F>(&self, path: &str, build: F) -> Result<Response, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match build().send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(status = %response.status(), attempt, "Response received");
                    return Ok(response);
                }
                Ok(response) => FetchError::Status {
                    endpoint: path.to_string(),
                    status: response.status().as_u16(),
                },
                Err(e) => FetchError::Http(e),
            };

            if self.retry_strategy.has_attempts_after(attempt)
                && self.retry_strategy.should_retry(&error)
            {
                let delay = self.retry_strategy.delay_for_attempt(attempt);
                warn!(
                    error = %error,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(error);
        }
    }
}

/// Parses and normalizes a base URL so that relative joins keep its path.
fn parse_base_url(base_url: &str) -> Result<Url, FetchError> {
    let mut text = base_url.trim().to_string();
    if !text.ends_with('/') {
        text.push('/');
    }
    let url = Url::parse(&text).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl(format!("{base_url}: not a base URL")));
    }
    Ok(url)
}

/// Reads a body and decodes it, attributing failures to the endpoint.
async fn decode_json<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, FetchError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| FetchError::InvalidResponse {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
