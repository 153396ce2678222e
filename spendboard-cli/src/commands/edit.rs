//! Edit command - change the cost trend or service usage and commit it.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use spendboard_store::{CommitOutcome, EditTarget, Settings};
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat, session};

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// Slice to edit.
    pub target: TargetArg,

    /// Field assignment, e.g. `0:cost=1200` or `2:value=15`. Repeatable.
    #[arg(long = "set", value_name = "INDEX:FIELD=VALUE", value_parser = parse_assignment)]
    pub sets: Vec<Assignment>,

    /// Print the edited buffer without committing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Editable slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    /// Monthly cost trend.
    Costs,
    /// Service usage breakdown.
    Usage,
}

impl From<TargetArg> for EditTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Costs => EditTarget::CostSeries,
            TargetArg::Usage => EditTarget::ServiceUsage,
        }
    }
}

/// One `INDEX:FIELD=VALUE` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub index: usize,
    pub field: String,
    pub value: String,
}

fn parse_assignment(text: &str) -> Result<Assignment, String> {
    let (index, rest) = text
        .split_once(':')
        .ok_or_else(|| format!("expected INDEX:FIELD=VALUE, got {text:?}"))?;
    let (field, value) = rest
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX:FIELD=VALUE, got {text:?}"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("bad index {index:?}"))?;

    Ok(Assignment {
        index,
        field: field.trim().to_string(),
        value: value.to_string(),
    })
}

/// Runs the edit command.
pub async fn run(args: &EditArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let target = EditTarget::from(args.target);
    let mut dashboard = session::mount(cli, settings, false).await?;
    let mut editor = dashboard.begin_edit(target).await?;

    for set in &args.sets {
        editor
            .set_field(set.index, &set.field, &set.value)
            .with_context(|| format!("cannot set {}:{}", set.index, set.field))?;
    }

    let text = TextFormatter::new(!cli.no_color);

    if args.dry_run || args.sets.is_empty() {
        dashboard.unmount().await;
        if let Some(buffer) = editor.buffer() {
            match cli.format {
                OutputFormat::Text => println!("{}", text.format_edit_buffer(buffer)),
                OutputFormat::Json => {
                    let formatter = JsonFormatter::new(cli.pretty);
                    println!("{}", formatter.format_edit_buffer(buffer)?);
                }
            }
        }
        return Ok(());
    }

    info!(%target, edits = args.sets.len(), "Committing edits");
    let outcome = dashboard.commit_edits(&mut editor).await?;
    dashboard.unmount().await;

    let committed = matches!(outcome, CommitOutcome::Committed(_));
    match cli.format {
        OutputFormat::Text => {
            println!("{}", text.format_notice(committed, &outcome.notice(target)));
            if let CommitOutcome::Failed(message) = &outcome {
                eprintln!("{message}");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_commit(target, &outcome)?);
        }
    }

    if !committed {
        ExitCode::CommitFailed.exit();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let set = parse_assignment("2:cost=1200.50").unwrap();
        assert_eq!(set.index, 2);
        assert_eq!(set.field, "cost");
        assert_eq!(set.value, "1200.50");
    }

    #[test]
    fn test_parse_assignment_keeps_equals_in_value() {
        let set = parse_assignment("0:month=a=b").unwrap();
        assert_eq!(set.value, "a=b");
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(parse_assignment("cost=1").is_err());
        assert!(parse_assignment("0:cost").is_err());
        assert!(parse_assignment("x:cost=1").is_err());
    }
}
