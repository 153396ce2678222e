//! Cost optimization calculator.
//!
//! The backend's `/estimate-cost` endpoint is authoritative; the local
//! formula here must always agree with it and is used to cross-check the
//! round-trip.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tolerance used when comparing a backend estimate to the local formula.
pub const ESTIMATE_TOLERANCE: f64 = 0.005;

// ============================================================================
// Estimator Inputs
// ============================================================================

/// Inputs to the monthly cost estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorInputs {
    /// Number of instances.
    pub instance_count: f64,
    /// Hours each instance runs per day.
    pub hours_per_day: f64,
    /// Billable days per month.
    pub days_per_month: f64,
    /// Hourly rate in USD.
    pub cost_per_hour: f64,
}

impl Default for EstimatorInputs {
    /// One always-on instance at $0.10/h over a 30 day month.
    fn default() -> Self {
        Self {
            instance_count: 1.0,
            hours_per_day: 24.0,
            days_per_month: 30.0,
            cost_per_hour: 0.1,
        }
    }
}

impl EstimatorInputs {
    /// Creates a new set of inputs.
    pub fn new(instance_count: f64, hours_per_day: f64, days_per_month: f64, cost_per_hour: f64) -> Self {
        Self {
            instance_count,
            hours_per_day,
            days_per_month,
            cost_per_hour,
        }
    }

    /// Monthly cost according to the local formula.
    pub fn monthly_cost(&self) -> f64 {
        estimate_monthly_cost(self)
    }

    /// Rejects negative or non-finite inputs.
    ///
    /// The estimate itself never calls this; it is an opt-in guard for
    /// callers that collect inputs from users.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] naming the first bad field.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("instanceCount", self.instance_count),
            ("hoursPerDay", self.hours_per_day),
            ("daysPerMonth", self.days_per_month),
            ("costPerHour", self.cost_per_hour),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidInput { field, value });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Estimate
// ============================================================================

/// Backend response for an estimate request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    /// Estimated monthly cost in USD.
    pub estimated_monthly_cost: f64,
}

impl CostEstimate {
    /// Returns true if the estimate agrees with the local formula.
    pub fn matches(&self, inputs: &EstimatorInputs) -> bool {
        (round_cents(self.estimated_monthly_cost) - round_cents(inputs.monthly_cost())).abs()
            < ESTIMATE_TOLERANCE
    }

    /// Two-decimal display string.
    pub fn display(&self) -> String {
        format_usd(self.estimated_monthly_cost)
    }
}

/// `instanceCount x hoursPerDay x daysPerMonth x costPerHour`.
pub fn estimate_monthly_cost(inputs: &EstimatorInputs) -> f64 {
    inputs.instance_count * inputs.hours_per_day * inputs.days_per_month * inputs.cost_per_hour
}

/// Rounds to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats an amount with exactly two decimals.
pub fn format_usd(value: f64) -> String {
    format!("{value:.2}")
}

// ============================================================================
// Tests
// ============================================================================
