//! JSON output formatting.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use spendboard_core::{CostEstimate, DateRange, EstimatorInputs, ViewModel, round_cents};
use spendboard_store::{CommitOutcome, EditBuffer, EditTarget, LoadReport, RangeOutcome};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the whole dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOutput<'a> {
    #[serde(flatten)]
    pub view: &'a ViewModel,
    pub total_cost: f64,
    pub total_resource_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeOutput>,
}

/// An applied date range.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOutput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An estimate with its inputs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOutput {
    pub inputs: EstimatorInputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_cost: Option<f64>,
    pub local_monthly_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_local: Option<bool>,
}

/// The result of an edit commit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutput {
    pub target: String,
    pub committed: bool,
    pub notice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One endpoint check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointOutput {
    pub endpoint: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u128,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }

    /// Formats the view model with totals and, if given, the applied range.
    pub fn format_view(
        &self,
        view: &ViewModel,
        range: Option<(&DateRange, &RangeOutcome)>,
    ) -> Result<String> {
        let output = ViewOutput {
            view,
            total_cost: round_cents(view.total_cost()),
            total_resource_cost: round_cents(view.total_resource_cost()),
            range: range.map(|(range, outcome)| Self::range_to_output(range, outcome)),
        };
        self.format(&output)
    }

    /// Formats an estimate. `None` means no backend request was made.
    pub fn format_estimate(
        &self,
        inputs: &EstimatorInputs,
        estimate: Option<&CostEstimate>,
    ) -> Result<String> {
        let output = EstimateOutput {
            inputs: *inputs,
            estimated_monthly_cost: estimate.map(|e| round_cents(e.estimated_monthly_cost)),
            local_monthly_cost: round_cents(inputs.monthly_cost()),
            matches_local: estimate.map(|e| e.matches(inputs)),
        };
        self.format(&output)
    }

    /// Formats an uncommitted edit buffer in the backend's wire shape.
    pub fn format_edit_buffer(&self, buffer: &EditBuffer) -> Result<String> {
        match buffer {
            EditBuffer::CostSeries(series) => self.format(series),
            EditBuffer::ServiceUsage(usage) => self.format(usage),
        }
    }

    /// Formats a commit outcome.
    pub fn format_commit(&self, target: EditTarget, outcome: &CommitOutcome) -> Result<String> {
        let output = CommitOutput {
            target: target.to_string(),
            committed: matches!(outcome, CommitOutcome::Committed(_)),
            notice: outcome.notice(target),
            error: match outcome {
                CommitOutcome::Failed(message) => Some(message.clone()),
                CommitOutcome::Committed(_) => None,
            },
        };
        self.format(&output)
    }

    /// Formats the endpoint check report.
    pub fn format_report(&self, report: &LoadReport) -> Result<String> {
        let items: Vec<EndpointOutput> = report
            .endpoints
            .iter()
            .map(|entry| EndpointOutput {
                endpoint: entry.endpoint.path().to_string(),
                ok: entry.is_ok(),
                items: entry.result.as_ref().ok().copied(),
                error: entry.result.as_ref().err().cloned(),
                elapsed_ms: entry.elapsed.as_millis(),
            })
            .collect();
        self.format(&items)
    }

    fn range_to_output(range: &DateRange, outcome: &RangeOutcome) -> RangeOutput {
        let (outcome, error) = match outcome {
            RangeOutcome::Applied { .. } => ("applied", None),
            RangeOutcome::Stale => ("stale", None),
            RangeOutcome::Failed(message) => ("failed", Some(message.clone())),
            RangeOutcome::Unmounted => ("unmounted", None),
        };
        RangeOutput {
            start_date: range.start(),
            end_date: range.end(),
            outcome: outcome.to_string(),
            error,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_range_output_carries_error() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let output = JsonFormatter::range_to_output(&range, &RangeOutcome::Failed("boom".into()));
        assert_eq!(output.outcome, "failed");
        assert_eq!(output.error.as_deref(), Some("boom"));
    }
}
