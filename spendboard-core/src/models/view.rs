//! The render-ready view model and its slices.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cost::{resources_total, series_total, CostSample, ResourceRecord};
use super::usage::{DailyCostBreakdown, UsageBreakdown};

// ============================================================================
// Slice
// ============================================================================

/// One independently replaceable part of the [`ViewModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    /// Monthly cost trend.
    CostSeries,
    /// Service-usage breakdown.
    ServiceUsage,
    /// Daily cost variation.
    DailyCosts,
    /// Resource inventory.
    Resources,
}

impl Slice {
    /// All slices, in display order.
    pub fn all() -> &'static [Slice] {
        &[
            Slice::CostSeries,
            Slice::ServiceUsage,
            Slice::DailyCosts,
            Slice::Resources,
        ]
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Slice::CostSeries => "Monthly Cost Trend",
            Slice::ServiceUsage => "Service Usage Breakdown",
            Slice::DailyCosts => "Daily Cost Variation",
            Slice::Resources => "Cloud Resource Tracker",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A whole-slice replacement value.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceUpdate {
    /// New cost series.
    CostSeries(Vec<CostSample>),
    /// New service-usage breakdown.
    ServiceUsage(UsageBreakdown),
    /// New daily-cost breakdown.
    DailyCosts(DailyCostBreakdown),
    /// New resource list.
    Resources(Vec<ResourceRecord>),
}

impl SliceUpdate {
    /// The slice this update replaces.
    pub fn slice(&self) -> Slice {
        match self {
            SliceUpdate::CostSeries(_) => Slice::CostSeries,
            SliceUpdate::ServiceUsage(_) => Slice::ServiceUsage,
            SliceUpdate::DailyCosts(_) => Slice::DailyCosts,
            SliceUpdate::Resources(_) => Slice::Resources,
        }
    }
}

// ============================================================================
// Load Status
// ============================================================================

/// Status of the initial bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Initial load in flight.
    Loading,
    /// All slices populated.
    Ready,
    /// Initial load failed; carries the failing request's message.
    Failed(String),
}

impl LoadStatus {
    /// Returns true while the initial load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    /// Returns the error message if the load failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns true once the load has settled either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadStatus::Ready | LoadStatus::Failed(_))
    }
}

// ============================================================================
// View Model
// ============================================================================

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// Monthly cost trend.
    pub cost_series: Vec<CostSample>,
    /// Service-usage breakdown.
    pub service_usage: UsageBreakdown,
    /// Daily cost variation.
    pub daily_costs: DailyCostBreakdown,
    /// Resource inventory.
    pub resources: Vec<ResourceRecord>,
    /// Initial-load status.
    pub status: LoadStatus,
}

impl ViewModel {
    /// Creates an empty view model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one slice wholesale.
    pub fn replace(&mut self, update: SliceUpdate) {
        match update {
            SliceUpdate::CostSeries(series) => self.cost_series = series,
            SliceUpdate::ServiceUsage(usage) => self.service_usage = usage,
            SliceUpdate::DailyCosts(daily) => self.daily_costs = daily,
            SliceUpdate::Resources(resources) => self.resources = resources,
        }
    }

    /// Returns true if no slice holds data.
    pub fn is_empty(&self) -> bool {
        self.cost_series.is_empty()
            && self.service_usage.is_empty()
            && self.daily_costs.is_empty()
            && self.resources.is_empty()
    }

    /// Total of the cost series.
    pub fn total_cost(&self) -> f64 {
        series_total(&self.cost_series)
    }

    /// Total of the resource inventory.
    pub fn total_resource_cost(&self) -> f64 {
        resources_total(&self.resources)
    }
}

// ============================================================================
// Tests
// ============================================================================
