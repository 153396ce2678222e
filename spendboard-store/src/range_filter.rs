//! Range-filtered cost-series reloads.

use chrono::NaiveDate;
use spendboard_core::{DateRange, Slice};
use spendboard_fetch::DashboardApi;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::view_model::{ViewModelStore, WriteOutcome};

/// What happened to a range request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOutcome {
    /// The cost series was replaced with `samples` entries.
    Applied {
        /// Samples in the new series.
        samples: usize,
    },
    /// A newer cost-series write won; the response was discarded.
    Stale,
    /// The request failed; the cost series is unchanged.
    Failed(String),
    /// The dashboard was unmounted before the response arrived.
    Unmounted,
}

/// Validates a range and replaces the cost-series slice with the filtered read.
///
/// Request failures are logged and reported as [`RangeOutcome::Failed`]; they
/// never change the view model.
///
/// # Errors
///
/// Returns [`StoreError::Core`] if `start > end`. No request is made.
pub async fn apply_range<A>(
    store: &ViewModelStore,
    api: &A,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RangeOutcome, StoreError>
where
    A: DashboardApi + ?Sized,
{
    let range = DateRange::new(start, end)?;

    let Some(generation) = store.reserve_generation().await else {
        return Ok(RangeOutcome::Unmounted);
    };
    debug!(range = %range, generation, "Range filter issued");

    let series = match api.filtered_costs(&range).await {
        Ok(series) => series,
        Err(e) => {
            warn!(range = %range, error = %e, "Range filter request failed");
            return Ok(RangeOutcome::Failed(e.to_string()));
        }
    };

    let samples = series.len();
    Ok(match store.set_cost_series(generation, series).await {
        WriteOutcome::Applied(Slice::CostSeries) => {
            info!(range = %range, samples, "Range filter applied");
            RangeOutcome::Applied { samples }
        }
        WriteOutcome::Unmounted => RangeOutcome::Unmounted,
        _ => RangeOutcome::Stale,
    })
}

/// Tracks the operator's selected range and applies it.
pub struct RangeFilterController<A: ?Sized> {
    store: Arc<ViewModelStore>,
    api: Arc<A>,
    current: RwLock<Option<DateRange>>,
}

impl<A> RangeFilterController<A>
where
    A: DashboardApi + ?Sized,
{
    /// Creates a controller writing into `store`.
    pub fn new(store: Arc<ViewModelStore>, api: Arc<A>) -> Self {
        Self {
            store,
            api,
            current: RwLock::new(None),
        }
    }

    /// The default selection: one month before `today` through `today`.
    pub fn default_range(today: NaiveDate) -> DateRange {
        DateRange::default_window(today)
    }

    /// The last successfully applied range.
    pub async fn current(&self) -> Option<DateRange> {
        *self.current.read().await
    }

    /// Applies a new range. See [`apply_range`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] if `start > end`.
    pub async fn apply(&self, start: NaiveDate, end: NaiveDate) -> Result<RangeOutcome, StoreError> {
        let outcome = apply_range(&self.store, self.api.as_ref(), start, end).await?;
        if matches!(outcome, RangeOutcome::Applied { .. }) {
            *self.current.write().await = DateRange::new(start, end).ok();
        }
        Ok(outcome)
    }
}
