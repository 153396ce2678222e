//! Check command - query each initial-load endpoint independently.

use anyhow::Result;
use spendboard_store::{Settings, load_report};
use tracing::warn;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat, session};

/// Runs the check command.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let backend = session::backend(cli, settings)?;
    let report = load_report(backend.as_ref()).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("Backend: {}", backend.client().base_url());
            println!("{}", "─".repeat(40));
            println!("{}", formatter.format_report(&report));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(&report)?);
        }
    }

    if !report.all_ok() {
        for failure in report.failures() {
            warn!(endpoint = failure.endpoint.path(), "Endpoint check failed");
        }
        ExitCode::Unavailable.exit();
    }

    Ok(())
}
