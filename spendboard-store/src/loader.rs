//! Initial bulk load.
//!
//! The mount path uses [`load_all`], a fail-fast join: the four slices are
//! assigned together or not at all. [`load_report`] runs the same four reads
//! independently and reports each one, for diagnostics only.

use futures::join;
use spendboard_core::{
    CostSample, DailyCostBreakdown, ResourceRecord, SliceUpdate, UsageBreakdown,
};
use spendboard_fetch::{DashboardApi, Endpoint, FetchError};
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::view_model::ViewModelStore;

// ============================================================================
// Fail-Fast Join
// ============================================================================

/// The four slices of a successful initial load.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialLoad {
    /// Monthly cost trend.
    pub cost_series: Vec<CostSample>,
    /// Service-usage breakdown.
    pub service_usage: UsageBreakdown,
    /// Daily-cost breakdown.
    pub daily_costs: DailyCostBreakdown,
    /// Resource inventory.
    pub resources: Vec<ResourceRecord>,
}

impl InitialLoad {
    /// Converts into whole-slice replacements.
    pub fn into_updates(self) -> Vec<SliceUpdate> {
        vec![
            SliceUpdate::CostSeries(self.cost_series),
            SliceUpdate::ServiceUsage(self.service_usage),
            SliceUpdate::DailyCosts(self.daily_costs),
            SliceUpdate::Resources(self.resources),
        ]
    }
}

/// Issues the four reads concurrently. The first failure fails the whole load.
///
/// # Errors
///
/// Returns the error of the first read to fail.
pub async fn load_all<A>(api: &A) -> Result<InitialLoad, FetchError>
where
    A: DashboardApi + ?Sized,
{
    let (cost_series, service_usage, daily_costs, resources) = tokio::try_join!(
        api.cost_series(),
        api.service_usage(),
        api.daily_costs(),
        api.resources(),
    )?;

    Ok(InitialLoad {
        cost_series,
        service_usage,
        daily_costs,
        resources,
    })
}

/// Runs the initial load and records the outcome in `store`.
///
/// The store shows [`Loading`](spendboard_core::LoadStatus::Loading) until the
/// join settles. Returns false if the store was disposed before the result
/// could be applied.
pub async fn run_initial_load<A>(store: &ViewModelStore, api: &A) -> bool
where
    A: DashboardApi + ?Sized,
{
    let Some(generation) = store.begin_loading().await else {
        return false;
    };
    info!("Initial load started");

    match load_all(api).await {
        Ok(load) => store.populate(generation, load.into_updates()).await,
        Err(e) => {
            error!(error = %e, "Initial load failed");
            store.fail_load(e.to_string()).await
        }
    }
}

// ============================================================================
// Per-Endpoint Report
// ============================================================================

/// Result of one read in a [`LoadReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointReport {
    /// The endpoint queried.
    pub endpoint: Endpoint,
    /// Item count on success, error message on failure.
    pub result: Result<usize, String>,
    /// Time until the response settled.
    pub elapsed: Duration,
}

impl EndpointReport {
    async fn measure<T, F>(endpoint: Endpoint, request: F, count: fn(&T) -> usize) -> Self
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let started = Instant::now();
        let result = request.await;
        Self {
            endpoint,
            result: result.as_ref().map(count).map_err(ToString::to_string),
            elapsed: started.elapsed(),
        }
    }

    /// Returns true if the read succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Independent results for each initial-load endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// One entry per endpoint, in initial-load order.
    pub endpoints: Vec<EndpointReport>,
}

impl LoadReport {
    /// Returns true if every read succeeded.
    pub fn all_ok(&self) -> bool {
        self.endpoints.iter().all(EndpointReport::is_ok)
    }

    /// The failed reads.
    pub fn failures(&self) -> impl Iterator<Item = &EndpointReport> {
        self.endpoints.iter().filter(|e| !e.is_ok())
    }
}

/// Issues the four reads concurrently and waits for all of them.
///
/// Never touches a [`ViewModelStore`].
pub async fn load_report<A>(api: &A) -> LoadReport
where
    A: DashboardApi + ?Sized,
{
    let (costs, usage, daily, resources) = join!(
        EndpointReport::measure(Endpoint::CloudCosts, api.cost_series(), Vec::len),
        EndpointReport::measure(Endpoint::ServiceUsage, api.service_usage(), UsageBreakdown::len),
        EndpointReport::measure(Endpoint::DailyCosts, api.daily_costs(), UsageBreakdown::len),
        EndpointReport::measure(Endpoint::Resources, api.resources(), Vec::len),
    );

    let report = LoadReport {
        endpoints: vec![costs, usage, daily, resources],
    };
    info!(
        ok = report.endpoints.iter().filter(|e| e.is_ok()).count(),
        total = report.endpoints.len(),
        "Load report complete"
    );
    report
}
