//! Show command - load the dashboard once and print it.

use anyhow::Result;
use spendboard_store::Settings;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, session};

/// Runs the show command.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let mut dashboard = session::mount(cli, settings, false).await?;
    let view = dashboard.snapshot().await;
    dashboard.unmount().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_view(&view));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_view(&view, None)?);
        }
    }

    Ok(())
}
