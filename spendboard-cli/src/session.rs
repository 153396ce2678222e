//! Backend connection and dashboard mounting shared by the commands.

use anyhow::Result;
use spendboard_core::LoadStatus;
use spendboard_fetch::HttpBackend;
use spendboard_store::{Dashboard, Settings};
use std::sync::Arc;
use tracing::debug;

use crate::{Cli, ExitCode};

/// Builds the HTTP backend from settings and the `--api-url` override.
pub fn backend(cli: &Cli, settings: &Settings) -> Result<Arc<HttpBackend>> {
    let client = settings.api_client(cli.api_url.as_deref())?;
    debug!(base = %client.base_url(), "Using backend");
    Ok(Arc::new(HttpBackend::new(client)))
}

/// Mounts a dashboard and waits for the initial load.
///
/// With `live` unset the push channel is not opened, even when enabled in
/// settings. A failed load unmounts, reports the error and exits.
pub async fn mount(cli: &Cli, settings: &Settings, live: bool) -> Result<Dashboard<HttpBackend>> {
    let client = settings.api_client(cli.api_url.as_deref())?;
    let mut options = settings.dashboard_options(&client)?;
    if !live {
        options.push = None;
    }

    let mut dashboard = Dashboard::mount(Arc::new(HttpBackend::new(client)), options);

    match dashboard.loaded().await {
        LoadStatus::Failed(message) => {
            dashboard.unmount().await;
            if !cli.quiet {
                eprintln!("Error: failed to load dashboard: {message}");
            }
            ExitCode::LoadFailed.exit();
        }
        status => debug!(?status, "Dashboard loaded"),
    }

    Ok(dashboard)
}
