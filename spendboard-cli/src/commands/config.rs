//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use spendboard_store::{SettingsStore, default_config_dir};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the backend base URL.
    SetUrl {
        /// Base URL, e.g. http://127.0.0.1:8000.
        url: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await,
        ConfigAction::Path => show_paths(cli, store),
        ConfigAction::SetUrl { url } => set_url(url, store).await,
        ConfigAction::Reset => reset_config(store).await,
    }
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("SpendBoard Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Backend URL:     {}", settings.api_base_url);
            println!("Request timeout: {}s", settings.request_timeout().as_secs());
            println!(
                "Retries:         {}",
                if settings.retry.is_enabled() { "on" } else { "off" }
            );
            println!();
            println!("Push channel:    {}", if settings.push_enabled { "on" } else { "off" });
            println!("Push path:       {}", settings.push_path);
            println!(
                "Reconnect:       {}",
                if settings.reconnect.enabled {
                    format!("up to {} attempts", settings.reconnect.max_attempts)
                } else {
                    "off".to_string()
                }
            );
            println!();
            println!("Cost ordering:   {}", settings.cost_series_ordering);
            println!("Log level:       {}", settings.log_level);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_url(url: &str, store: &SettingsStore) -> Result<()> {
    store.set_api_base_url(url).await?;
    store.save().await?;

    let url = store.api_base_url().await;
    info!(url = %url, "Backend URL updated");
    println!("Backend URL set to: {url}");

    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    let path = store.path();

    if path.exists() {
        tokio::fs::remove_file(path).await?;
        store.reset().await;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
