//! Settings file I/O.
//!
//! Files are written whole through a sibling `.tmp` file and a rename, so a
//! crash mid-write leaves the previous file intact. On Unix the file is
//! readable by its owner only.

use serde::{Serialize, de::DeserializeOwned};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

const APP_DIR: &str = "spendboard";
const SETTINGS_FILE: &str = "settings.json";

#[cfg(unix)]
const FILE_MODE: u32 = 0o600;
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// The platform config directory joined with `spendboard`.
///
/// Falls back to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR))
}

pub fn default_settings_path() -> PathBuf {
    default_config_dir().join(SETTINGS_FILE)
}

/// Writes `data` as pretty JSON to `path`.
///
/// A missing parent directory is created owner-only. An existing one keeps
/// its mode.
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(data)?;

    ensure_parent(path).await?;

    let staging = staging_path(path);
    tokio::fs::write(&staging, json).await?;
    #[cfg(unix)]
    restrict(&staging, FILE_MODE).await?;
    tokio::fs::rename(&staging, path).await?;

    debug!(path = %path.display(), "Settings written");
    Ok(())
}

/// Reads and decodes `path`.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let raw = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Like [`load_json`], but falls back to `T::default()`.
///
/// An absent file is silent; anything else unreadable is logged.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No settings file");
            T::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable settings, using defaults");
            T::default()
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::try_exists(parent).await? {
        return Ok(());
    }

    tokio::fs::create_dir_all(parent).await?;
    #[cfg(unix)]
    restrict(parent, DIR_MODE).await?;
    debug!(path = %parent.display(), "Created config directory");
    Ok(())
}

#[cfg(unix)]
async fn restrict(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    Ok(())
}
