//! Mounted dashboard session.
//!
//! [`Dashboard::mount`] creates the view model, opens the push channel, and
//! starts the initial load. [`Dashboard::unmount`] (or drop) tears all of it
//! down; results still in flight at that point are discarded.

use chrono::NaiveDate;
use spendboard_core::{CostEstimate, DateRange, EstimatorInputs, LoadStatus, ViewModel};
use spendboard_fetch::{DashboardApi, PushSource};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::edit_buffer::{CommitOutcome, EditBufferController, EditTarget};
use crate::error::StoreError;
use crate::estimator::request_estimate;
use crate::loader::run_initial_load;
use crate::push_channel::{PushChannel, ReconnectPolicy};
use crate::range_filter::{RangeFilterController, RangeOutcome};
use crate::view_model::{CostSeriesOrdering, ViewModelStore};

/// Mount-time options.
#[derive(Clone, Default)]
pub struct DashboardOptions {
    /// Push source to open at mount. `None` runs without live updates.
    pub push: Option<Arc<dyn PushSource>>,
    /// Reconnect behaviour for the push channel.
    pub reconnect: ReconnectPolicy,
    /// Cost-series write ordering.
    pub ordering: CostSeriesOrdering,
}

impl DashboardOptions {
    /// Sets the push source.
    pub fn with_push(mut self, source: Arc<dyn PushSource>) -> Self {
        self.push = Some(source);
        self
    }

    /// Sets the reconnect policy.
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Sets the cost-series ordering.
    pub fn with_ordering(mut self, ordering: CostSeriesOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

/// A mounted dashboard.
pub struct Dashboard<A: ?Sized> {
    api: Arc<A>,
    store: Arc<ViewModelStore>,
    range: RangeFilterController<A>,
    channel: Option<PushChannel>,
    load_task: Option<JoinHandle<()>>,
}

impl<A> Dashboard<A>
where
    A: DashboardApi + ?Sized + 'static,
{
    /// Mounts the dashboard. Must be called from within a tokio runtime.
    pub fn mount(api: Arc<A>, options: DashboardOptions) -> Self {
        let store = Arc::new(ViewModelStore::with_ordering(options.ordering));

        let channel = options
            .push
            .map(|source| PushChannel::open(source, Arc::clone(&store), options.reconnect));

        let load_task = {
            let store = Arc::clone(&store);
            let api = Arc::clone(&api);
            tokio::spawn(async move {
                run_initial_load(&store, api.as_ref()).await;
            })
        };

        info!(push = channel.is_some(), ordering = %options.ordering, "Dashboard mounted");

        Self {
            range: RangeFilterController::new(Arc::clone(&store), Arc::clone(&api)),
            api,
            store,
            channel,
            load_task: Some(load_task),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<ViewModelStore> {
        &self.store
    }

    /// The backend.
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// The push channel, if one was opened.
    pub fn push_channel(&self) -> Option<&PushChannel> {
        self.channel.as_ref()
    }

    /// Returns a copy of the current view model.
    pub async fn snapshot(&self) -> ViewModel {
        self.store.snapshot().await
    }

    /// Waits until the initial load settles or the dashboard is unmounted.
    pub async fn loaded(&self) -> LoadStatus {
        let mut changes = self.store.subscribe();
        loop {
            let status = self.store.status().await;
            if status.is_settled() || !self.store.is_mounted().await {
                return status;
            }
            if changes.changed().await.is_err() {
                return status;
            }
        }
    }

    /// Applies a date range to the cost series.
    ///
    /// # Errors
    ///
    /// Returns an error if `start > end`. Request failures are reported in
    /// the outcome, not as errors.
    pub async fn apply_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RangeOutcome, StoreError> {
        self.range.apply(start, end).await
    }

    /// The last successfully applied range.
    pub async fn current_range(&self) -> Option<DateRange> {
        self.range.current().await
    }

    /// Requests a monthly estimate from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn estimate(&self, inputs: &EstimatorInputs) -> Result<CostEstimate, StoreError> {
        request_estimate(self.api.as_ref(), inputs).await
    }

    /// Starts an edit session from the current view model.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unmounted`] after unmount.
    pub async fn begin_edit(&self, target: EditTarget) -> Result<EditBufferController, StoreError> {
        if !self.store.is_mounted().await {
            return Err(StoreError::Unmounted);
        }
        let snapshot = self.store.snapshot().await;
        let mut editor = EditBufferController::new();
        editor.begin_edit(target, &snapshot);
        Ok(editor)
    }

    /// Commits an edit session and, on success, copies the committed slice
    /// back into the view model.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotEditing`] if the controller has no session.
    pub async fn commit_edits(
        &self,
        editor: &mut EditBufferController,
    ) -> Result<CommitOutcome, StoreError> {
        let outcome = editor.commit(self.api.as_ref()).await?;
        if let CommitOutcome::Committed(update) = &outcome {
            self.store.set_slice(update.clone()).await;
        }
        Ok(outcome)
    }

    /// Tears the dashboard down. Safe to call more than once.
    pub async fn unmount(&mut self) {
        self.store.dispose().await;
        if let Some(channel) = self.channel.take() {
            channel.close();
        }
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
        info!("Dashboard unmounted");
    }
}

impl<A: ?Sized> Drop for Dashboard<A> {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close();
        }
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
    }
}
