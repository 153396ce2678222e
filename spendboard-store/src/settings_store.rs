//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use serde::{Deserialize, Serialize};
use spendboard_fetch::{
    ApiClient, DEFAULT_BASE_URL, DEFAULT_PUSH_PATH, DEFAULT_TIMEOUT_SECS, PushSource,
    RetryStrategy, WebSocketSource,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::dashboard::DashboardOptions;
use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json_or_default, save_json};
use crate::push_channel::ReconnectPolicy;
use crate::view_model::CostSeriesOrdering;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ========================================================================
    // Backend
    // ========================================================================
    /// Backend base URL.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// HTTP retry behaviour. Single attempt unless configured.
    pub retry: RetryStrategy,

    // ========================================================================
    // Push Channel
    // ========================================================================
    /// Open the push channel at mount.
    pub push_enabled: bool,

    /// Push channel path on the backend host.
    pub push_path: String,

    /// Reconnect behaviour for the push channel.
    pub reconnect: ReconnectPolicy,

    // ========================================================================
    // Reconciliation & Diagnostics
    // ========================================================================
    /// Cost-series write ordering.
    pub cost_series_ordering: CostSeriesOrdering,

    /// Log level when neither `--verbose` nor `--quiet` is given.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryStrategy::no_retry(),
            push_enabled: true,
            push_path: DEFAULT_PUSH_PATH.to_string(),
            reconnect: ReconnectPolicy::default(),
            cost_series_ordering: CostSeriesOrdering::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Request timeout as a [`Duration`]. Zero falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Builds the HTTP client. `base_override` replaces the configured URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL is invalid.
    pub fn api_client(&self, base_override: Option<&str>) -> Result<ApiClient, StoreError> {
        let base = base_override.unwrap_or(&self.api_base_url);
        let client = ApiClient::with_timeout(base, self.request_timeout())
            .map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(client.with_retry_strategy(self.retry))
    }

    /// Builds mount options for a dashboard talking to `client`'s host.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the push URL cannot be derived.
    pub fn dashboard_options(&self, client: &ApiClient) -> Result<DashboardOptions, StoreError> {
        let mut options = DashboardOptions::default()
            .with_reconnect(self.reconnect)
            .with_ordering(self.cost_series_ordering);

        if self.push_enabled {
            let url = client
                .push_url(&self.push_path)
                .map_err(|e| StoreError::Config(e.to_string()))?;
            let source: Arc<dyn PushSource> = Arc::new(WebSocketSource::new(url));
            options = options.with_push(source);
        }

        Ok(options)
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a new settings store with defaults.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json_or_default(&path).await
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let (notify, _) = watch::channel(0);
        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        })
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Restores defaults. Call [`save`](Self::save) to persist.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the backend base URL.
    pub async fn api_base_url(&self) -> String {
        self.settings.read().await.api_base_url.clone()
    }

    /// Sets the backend base URL after checking that it parses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for an invalid URL.
    pub async fn set_api_base_url(&self, url: &str) -> Result<(), StoreError> {
        ApiClient::new(url).map_err(|e| StoreError::Config(e.to_string()))?;
        let url = url.trim().to_string();
        self.update(|s| s.api_base_url = url).await;
        Ok(())
    }

    /// Gets whether the push channel opens at mount.
    pub async fn push_enabled(&self) -> bool {
        self.settings.read().await.push_enabled
    }

    /// Sets whether the push channel opens at mount.
    pub async fn set_push_enabled(&self, value: bool) {
        self.update(|s| s.push_enabled = value).await;
    }

    /// Gets the cost-series ordering.
    pub async fn cost_series_ordering(&self) -> CostSeriesOrdering {
        self.settings.read().await.cost_series_ordering
    }

    /// Sets the cost-series ordering.
    pub async fn set_cost_series_ordering(&self, ordering: CostSeriesOrdering) {
        self.update(|s| s.cost_series_ordering = ordering).await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_baseline() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "http://127.0.0.1:8000");
        assert!(settings.push_enabled);
        assert!(!settings.reconnect.enabled);
        assert!(!settings.retry.is_enabled());
        assert_eq!(settings.cost_series_ordering, CostSeriesOrdering::LastWriteWins);
        assert_eq!(settings.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"api_base_url":"https://spend.example.com"}"#).unwrap();
        assert_eq!(settings.api_base_url, "https://spend.example.com");
        assert_eq!(settings.push_path, "/ws");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_api_client_override() {
        let settings = Settings::default();
        let client = settings.api_client(Some("http://10.0.0.5:9000")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://10.0.0.5:9000/");
    }

    #[test]
    fn test_dashboard_options_push_toggle() {
        let mut settings = Settings::default();
        let client = settings.api_client(None).unwrap();
        assert!(settings.dashboard_options(&client).unwrap().push.is_some());

        settings.push_enabled = false;
        assert!(settings.dashboard_options(&client).unwrap().push.is_none());
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_set_invalid_url_rejected() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        assert!(store.set_api_base_url("not a url").await.is_err());
        assert_eq!(store.api_base_url().await, DEFAULT_BASE_URL);

        store.set_api_base_url("https://spend.example.com/api").await.unwrap();
        assert_eq!(store.api_base_url().await, "https://spend.example.com/api");
    }

    #[tokio::test]
    async fn test_update_notifies() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        let rx = store.subscribe();
        store.set_push_enabled(false).await;
        assert!(rx.has_changed().unwrap());
        assert!(!store.push_enabled().await);
    }
}
