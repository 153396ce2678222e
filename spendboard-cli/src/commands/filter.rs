//! Filter command - reload the cost trend for a date range.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use spendboard_core::{DateRange, parse_query_date};
use spendboard_store::{RangeOutcome, Settings};
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, session};

/// Arguments for the filter command.
#[derive(Args)]
pub struct FilterArgs {
    /// First day of the range (YYYY-MM-DD). Defaults to 30 days before today.
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    parse_query_date(text).map_err(|e| e.to_string())
}

/// Runs the filter command.
pub async fn run(args: &FilterArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let default = DateRange::default_window(Local::now().date_naive());
    let start = args.start.unwrap_or(default.start());
    let end = args.end.unwrap_or(default.end());

    // Rejected before anything is mounted.
    let range = DateRange::new(start, end)?;
    info!(start = %range.start(), end = %range.end(), "Filtering cost trend");

    let mut dashboard = session::mount(cli, settings, false).await?;
    let outcome = dashboard.apply_range(range.start(), range.end()).await?;
    let view = dashboard.snapshot().await;
    dashboard.unmount().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_range_outcome(&range, &outcome));
            println!();
            println!("{}", formatter.format_cost_series(&view.cost_series));
            if matches!(outcome, RangeOutcome::Failed(_)) && !cli.quiet {
                eprintln!("Showing the unfiltered cost trend");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_view(&view, Some((&range, &outcome)))?);
        }
    }

    Ok(())
}
