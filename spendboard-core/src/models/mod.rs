//! Domain models for SpendBoard.
//!
//! ## Submodules
//!
//! - [`cost`] - Cost series and resource records
//! - [`usage`] - Labeled breakdowns (service usage, daily costs)
//! - [`range`] - Date ranges and range validation
//! - [`estimate`] - Monthly cost calculator
//! - [`push`] - Push-channel message types
//! - [`view`] - The view model and its slices

mod cost;
mod estimate;
mod push;
mod range;
mod usage;
mod view;

pub use cost::{
    resources_total, series_peak, series_points, series_total, CostSample, ResourceRecord,
};
pub use estimate::{
    estimate_monthly_cost, format_usd, round_cents, CostEstimate, EstimatorInputs,
    ESTIMATE_TOLERANCE,
};
pub use push::{PushMessage, CLOUD_COSTS_TYPE, SERVICE_USAGE_TYPE};
pub use range::{parse_query_date, validate_range, DateRange, QUERY_DATE_FORMAT};
pub use usage::{DailyCostBreakdown, UsageBreakdown};
pub use view::{LoadStatus, Slice, SliceUpdate, ViewModel};
#[cfg(test)]
mod serde_tests;
