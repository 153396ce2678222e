//! Backend-computed monthly estimates.

use spendboard_core::{CostEstimate, EstimatorInputs};
use spendboard_fetch::DashboardApi;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Requests a monthly estimate from the backend.
///
/// The local formula is checked against the backend's answer and a mismatch
/// is logged; the backend value is returned either way.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn request_estimate<A>(api: &A, inputs: &EstimatorInputs) -> Result<CostEstimate, StoreError>
where
    A: DashboardApi + ?Sized,
{
    let estimate = api.estimate_cost(inputs).await?;
    if estimate.matches(inputs) {
        debug!(estimate = %estimate.display(), "Estimate matches local formula");
    } else {
        warn!(
            backend = estimate.estimated_monthly_cost,
            local = inputs.monthly_cost(),
            "Backend estimate differs from local formula"
        );
    }
    Ok(estimate)
}
