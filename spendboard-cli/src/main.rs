// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! SpendBoard CLI - cloud spend dashboard from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Load the dashboard once and print every panel
//! spendboard
//!
//! # Filter the cost trend to a date range
//! spendboard filter --start 2024-01-01 --end 2024-03-31
//!
//! # Ask the backend for a monthly estimate
//! spendboard estimate --instances 10 --hours 24 --days 30 --rate 0.10
//!
//! # Follow live updates
//! spendboard watch
//!
//! # Edit and commit a service-usage value
//! spendboard edit usage --set 0:value=42
//!
//! # JSON output
//! spendboard --format json --pretty
//! ```

mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use spendboard_store::{LogLevel, SettingsStore};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{check, config, edit, estimate, filter, show, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// SpendBoard CLI - cloud spend dashboard.
#[derive(Parser)]
#[command(name = "spendboard")]
#[command(about = "Cloud spend dashboard CLI")]
#[command(long_about = r#"
SpendBoard loads cloud spend data from a SpendBoard backend and keeps it
current over the backend's push channel.

Panels:
  • Monthly cost trend
  • Service usage breakdown
  • Daily cost variation
  • Cloud resource tracker

Examples:
  spendboard                                  # Load once and print all panels
  spendboard filter --start 2024-01-01        # Filter the cost trend
  spendboard estimate --instances 4           # Monthly cost estimate
  spendboard watch                            # Follow live updates
  spendboard --api-url http://10.0.0.5:8000   # Talk to another backend
"#)]
#[command(version)]
#[command(author = "SpendBoard Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'show' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Backend base URL, overriding the configured one.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Load the dashboard once and print every panel (default).
    #[command(visible_alias = "s")]
    Show,

    /// Filter the cost trend to a date range.
    #[command(visible_alias = "f")]
    Filter(filter::FilterArgs),

    /// Estimate a monthly cost.
    #[command(visible_alias = "e")]
    Estimate(estimate::EstimateArgs),

    /// Follow live updates from the push channel.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Edit and commit the cost trend or service usage.
    Edit(edit::EditArgs),

    /// Check each backend endpoint.
    Check,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// The initial load failed.
    LoadFailed = 2,
    /// The backend rejected an edit.
    CommitFailed = 3,
    /// At least one endpoint failed its check.
    Unavailable = 4,
}

impl ExitCode {
    /// Exits the process with this code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("spendboard=debug,info")
    } else {
        EnvFilter::new(format!("spendboard={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;

    setup_logging(cli.verbose, cli.quiet, settings.log_level);

    let result = match &cli.command {
        Some(Commands::Show) | None => show::run(&cli, &settings).await,
        Some(Commands::Filter(args)) => filter::run(args, &cli, &settings).await,
        Some(Commands::Estimate(args)) => estimate::run(args, &cli, &settings).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli, &settings).await,
        Some(Commands::Edit(args)) => edit::run(args, &cli, &settings).await,
        Some(Commands::Check) => check::run(&cli, &settings).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &store).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        ExitCode::Error.exit();
    }

    Ok(())
}
