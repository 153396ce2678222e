//! Watch command - follow live updates from the push channel.

use anyhow::Result;
use clap::Args;
use spendboard_core::ViewModel;
use spendboard_store::{ReconnectPolicy, Settings};
use std::io::{Write, stdout};
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, session};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Reconnect after the push channel drops, up to this many times.
    #[arg(long, value_name = "ATTEMPTS")]
    pub reconnect: Option<u32>,

    /// Bar width for the panels.
    #[arg(long, default_value = "20")]
    pub bar_width: usize,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let mut settings = settings.clone();
    if !settings.push_enabled {
        anyhow::bail!("Push channel is disabled; enable push_enabled in the settings file");
    }
    if let Some(attempts) = args.reconnect {
        settings.reconnect = ReconnectPolicy::bounded(attempts);
    }

    let mut dashboard = session::mount(cli, &settings, true).await?;
    let mut changes = dashboard.store().subscribe();
    info!(push = %settings.push_path, "Starting watch mode");

    let text = TextFormatter::new(!cli.no_color).with_bar_width(args.bar_width);
    let json = JsonFormatter::new(false);
    let mut updates = 0u64;

    loop {
        let view = dashboard.snapshot().await;
        let live = dashboard.push_channel().is_some_and(|c| !c.is_closed());
        match cli.format {
            OutputFormat::Text => render(&text, &view, updates, live)?,
            OutputFormat::Json => println!("{}", json.format_view(&view, None)?),
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                updates += 1;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    dashboard.unmount().await;
    Ok(())
}

fn render(formatter: &TextFormatter, view: &ViewModel, updates: u64, live: bool) -> Result<()> {
    // Clear screen
    print!("\x1b[2J\x1b[H");
    stdout().flush()?;

    let now = chrono::Local::now();
    println!(
        "SpendBoard Watch Mode - {} ({} updates, channel {})",
        now.format("%H:%M:%S"),
        updates,
        if live { "open" } else { "closed" }
    );
    println!("{}", "─".repeat(50));
    println!();
    println!("{}", formatter.format_view(view));
    println!();
    println!("Press Ctrl+C to exit");
    Ok(())
}
