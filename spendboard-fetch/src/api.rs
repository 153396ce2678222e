//! Dashboard backend API.
//!
//! [`DashboardApi`] is the seam between the reconciliation layer and the
//! network: the store only ever talks to this trait, and [`HttpBackend`] is
//! the production implementation over [`ApiClient`].

use async_trait::async_trait;
use spendboard_core::{
    CostEstimate, CostSample, DailyCostBreakdown, DateRange, EstimatorInputs, ResourceRecord,
    UsageBreakdown,
};
use std::fmt;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::FetchError;

// ============================================================================
// Endpoints
// ============================================================================

/// Every backend endpoint the dashboard uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /cloud-costs`
    CloudCosts,
    /// `GET /service-usage`
    ServiceUsage,
    /// `GET /daily-costs`
    DailyCosts,
    /// `GET /resources`
    Resources,
    /// `GET /filtered-costs?start_date=..&end_date=..`
    FilteredCosts,
    /// `POST /estimate-cost`
    EstimateCost,
    /// `PUT /update-cloud-costs`
    UpdateCloudCosts,
    /// `PUT /update-service-usage`
    UpdateServiceUsage,
}

impl Endpoint {
    /// Request path.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::CloudCosts => "/cloud-costs",
            Endpoint::ServiceUsage => "/service-usage",
            Endpoint::DailyCosts => "/daily-costs",
            Endpoint::Resources => "/resources",
            Endpoint::FilteredCosts => "/filtered-costs",
            Endpoint::EstimateCost => "/estimate-cost",
            Endpoint::UpdateCloudCosts => "/update-cloud-costs",
            Endpoint::UpdateServiceUsage => "/update-service-usage",
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::EstimateCost => "POST",
            Endpoint::UpdateCloudCosts | Endpoint::UpdateServiceUsage => "PUT",
            _ => "GET",
        }
    }

    /// The four endpoints of the initial bulk load.
    pub fn initial_load() -> &'static [Endpoint] {
        &[
            Endpoint::CloudCosts,
            Endpoint::ServiceUsage,
            Endpoint::DailyCosts,
            Endpoint::Resources,
        ]
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

// ============================================================================
// Dashboard API Trait
// ============================================================================

/// Operations the dashboard performs against its backend.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Loads the full monthly cost series.
    async fn cost_series(&self) -> Result<Vec<CostSample>, FetchError>;

    /// Loads the service-usage breakdown.
    async fn service_usage(&self) -> Result<UsageBreakdown, FetchError>;

    /// Loads the daily-cost breakdown.
    async fn daily_costs(&self) -> Result<DailyCostBreakdown, FetchError>;

    /// Loads the resource inventory.
    async fn resources(&self) -> Result<Vec<ResourceRecord>, FetchError>;

    /// Loads the cost series restricted to a date range.
    async fn filtered_costs(&self, range: &DateRange) -> Result<Vec<CostSample>, FetchError>;

    /// Asks the backend for a monthly cost estimate.
    async fn estimate_cost(&self, inputs: &EstimatorInputs) -> Result<CostEstimate, FetchError>;

    /// Replaces the stored cost series.
    async fn update_cloud_costs(&self, series: &[CostSample]) -> Result<(), FetchError>;

    /// Replaces the stored service-usage breakdown.
    async fn update_service_usage(&self, usage: &UsageBreakdown) -> Result<(), FetchError>;
}

// ============================================================================
// HTTP Backend
// ============================================================================

/// [`DashboardApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    /// Creates a backend using `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl DashboardApi for HttpBackend {
    async fn cost_series(&self) -> Result<Vec<CostSample>, FetchError> {
        self.client.get_json(Endpoint::CloudCosts.path(), &[]).await
    }

    async fn service_usage(&self) -> Result<UsageBreakdown, FetchError> {
        let usage: UsageBreakdown = self.client.get_json(Endpoint::ServiceUsage.path(), &[]).await?;
        usage.validate()?;
        Ok(usage)
    }

    async fn daily_costs(&self) -> Result<DailyCostBreakdown, FetchError> {
        let daily: DailyCostBreakdown = self.client.get_json(Endpoint::DailyCosts.path(), &[]).await?;
        daily.validate()?;
        Ok(daily)
    }

    async fn resources(&self) -> Result<Vec<ResourceRecord>, FetchError> {
        self.client.get_json(Endpoint::Resources.path(), &[]).await
    }

    async fn filtered_costs(&self, range: &DateRange) -> Result<Vec<CostSample>, FetchError> {
        debug!(range = %range, "Requesting filtered costs");
        self.client
            .get_json(Endpoint::FilteredCosts.path(), &range.query_params())
            .await
    }

    async fn estimate_cost(&self, inputs: &EstimatorInputs) -> Result<CostEstimate, FetchError> {
        self.client.post_json(Endpoint::EstimateCost.path(), inputs).await
    }

    async fn update_cloud_costs(&self, series: &[CostSample]) -> Result<(), FetchError> {
        self.client.put_json(Endpoint::UpdateCloudCosts.path(), series).await
    }

    async fn update_service_usage(&self, usage: &UsageBreakdown) -> Result<(), FetchError> {
        self.client.put_json(Endpoint::UpdateServiceUsage.path(), usage).await
    }
}

// ============================================================================
// Tests
// ============================================================================
