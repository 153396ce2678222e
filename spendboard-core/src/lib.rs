// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SpendBoard` Core
//!
//! Core types and pure logic for the `SpendBoard` cloud spend dashboard.
//!
//! This crate has no I/O. It provides:
//!
//! - Domain models matching the backend wire format
//! - Date range validation
//! - The monthly cost estimator
//! - Push-channel message parsing
//! - The view model the dashboard renders
//!
//! ## Key Types
//!
//! ### Spend Data
//! - [`CostSample`] - One month of the cost trend
//! - [`UsageBreakdown`] - Index-aligned labels and values
//! - [`ResourceRecord`] - One tracked resource
//!
//! ### Inputs
//! - [`DateRange`] - Validated `start <= end` range
//! - [`EstimatorInputs`] - Calculator inputs, see [`estimate_monthly_cost`]
//!
//! ### Reconciliation
//! - [`ViewModel`] - Render-ready aggregate of all slices
//! - [`Slice`] / [`SliceUpdate`] - Named parts and their replacements
//! - [`PushMessage`] - Typed push-channel update

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Spend data
    resources_total,
    series_peak,
    series_points,
    series_total,
    CostSample,
    DailyCostBreakdown,
    ResourceRecord,
    UsageBreakdown,
    // Ranges
    parse_query_date,
    validate_range,
    DateRange,
    QUERY_DATE_FORMAT,
    // Estimator
    estimate_monthly_cost,
    format_usd,
    round_cents,
    CostEstimate,
    EstimatorInputs,
    ESTIMATE_TOLERANCE,
    // Push channel
    PushMessage,
    CLOUD_COSTS_TYPE,
    SERVICE_USAGE_TYPE,
    // View model
    LoadStatus,
    Slice,
    SliceUpdate,
    ViewModel,
};
