//! Estimate command - monthly cost estimate.

use anyhow::Result;
use clap::Args;
use spendboard_core::EstimatorInputs;
use spendboard_store::{Settings, request_estimate};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, session};

/// Arguments for the estimate command.
#[derive(Args)]
pub struct EstimateArgs {
    /// Number of instances.
    #[arg(long, default_value = "1")]
    pub instances: f64,

    /// Hours each instance runs per day.
    #[arg(long, default_value = "24")]
    pub hours: f64,

    /// Billable days per month.
    #[arg(long, default_value = "30")]
    pub days: f64,

    /// Hourly rate in USD.
    #[arg(long, default_value = "0.1")]
    pub rate: f64,

    /// Reject negative or non-finite inputs before sending.
    #[arg(long)]
    pub strict: bool,

    /// Compute locally without asking the backend.
    #[arg(long)]
    pub local: bool,
}

impl EstimateArgs {
    fn inputs(&self) -> EstimatorInputs {
        EstimatorInputs::new(self.instances, self.hours, self.days, self.rate)
    }
}

/// Runs the estimate command.
pub async fn run(args: &EstimateArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let inputs = args.inputs();
    if args.strict {
        inputs.validate()?;
    }

    let estimate = if args.local {
        None
    } else {
        let backend = session::backend(cli, settings)?;
        Some(request_estimate(backend.as_ref(), &inputs).await?)
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_estimate(&inputs, estimate.as_ref()));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_estimate(&inputs, estimate.as_ref())?);
        }
    }

    Ok(())
}
