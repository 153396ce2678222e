//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, JSON persistence, and settings round-trip.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::persistence::{load_json, load_json_or_default, save_json};
use crate::push_channel::ReconnectPolicy;
use crate::settings_store::{LogLevel, Settings, SettingsStore};
use crate::view_model::CostSeriesOrdering;

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        api_base_url: "https://spend.example.com".into(),
        reconnect: ReconnectPolicy::bounded(3),
        cost_series_ordering: CostSeriesOrdering::Generational,
        log_level: LogLevel::Debug,
        ..Settings::default()
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("settings.json");

    save_json(&nested_path, &serde_json::json!({"key": "value"}))
        .await
        .unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_save_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    save_json(&file_path, &Settings::default()).await.unwrap();

    assert!(!file_path.with_extension("json.tmp").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    save_json(&file_path, &Settings::default()).await.unwrap();

    let mode = std::fs::metadata(&file_path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_corrupt_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{ not json").await.unwrap();

    let settings: Settings = load_json_or_default(&file_path).await;
    assert_eq!(settings, Settings::default());
}

// ============================================================================
// Settings Store Tests
// ============================================================================

#[tokio::test]
async fn test_settings_store_persists_changes() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(file_path.clone()).await.unwrap();
    store.set_api_base_url("http://10.1.2.3:8000").await.unwrap();
    store.set_cost_series_ordering(CostSeriesOrdering::Generational).await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(file_path).await.unwrap();
    assert_eq!(reloaded.api_base_url().await, "http://10.1.2.3:8000");
    assert_eq!(
        reloaded.cost_series_ordering().await,
        CostSeriesOrdering::Generational
    );
}

#[tokio::test]
async fn test_settings_store_reset() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::load(temp_dir.path().join("settings.json"))
        .await
        .unwrap();

    store.set_push_enabled(false).await;
    store.reset().await;

    assert_eq!(store.get().await, Settings::default());
}

#[tokio::test]
async fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::load(temp_dir.path().join("absent.json"))
        .await
        .unwrap();

    assert_eq!(store.get().await, Settings::default());
    assert!(store.path().ends_with("absent.json"));
}
