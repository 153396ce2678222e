//! View model state store.
//!
//! Owns the [`ViewModel`] shared by the initial load, the push channel, and
//! range-filtered reloads. Every write replaces a whole slice under the write
//! lock and is dropped once the store has been disposed.

use serde::{Deserialize, Serialize};
use spendboard_core::{CostSample, LoadStatus, PushMessage, Slice, SliceUpdate, ViewModel};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

// ============================================================================
// Ordering Mode
// ============================================================================

/// How competing cost-series writes are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostSeriesOrdering {
    /// Whichever write is observed last wins.
    #[default]
    LastWriteWins,
    /// Writes carry the generation reserved when they were issued; a write
    /// older than the one already applied is discarded.
    Generational,
}

impl fmt::Display for CostSeriesOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostSeriesOrdering::LastWriteWins => write!(f, "last_write_wins"),
            CostSeriesOrdering::Generational => write!(f, "generational"),
        }
    }
}

/// Result of a write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The slice was replaced.
    Applied(Slice),
    /// A newer cost-series write was already applied.
    Stale,
    /// Nothing to apply (e.g. an unrecognized push type).
    Ignored,
    /// The store has been disposed.
    Unmounted,
}

impl WriteOutcome {
    /// Returns true if the view model changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied(_))
    }
}

// ============================================================================
// Inner State
// ============================================================================

struct ViewModelInner {
    view: ViewModel,
    mounted: bool,
    ordering: CostSeriesOrdering,
    /// Last generation handed out.
    issued_generation: u64,
    /// Generation of the cost series currently displayed.
    applied_generation: u64,
}

impl ViewModelInner {
    fn new(ordering: CostSeriesOrdering) -> Self {
        Self {
            view: ViewModel::new(),
            mounted: true,
            ordering,
            issued_generation: 0,
            applied_generation: 0,
        }
    }

    fn reserve(&mut self) -> u64 {
        self.issued_generation += 1;
        self.issued_generation
    }

    fn write_cost_series(&mut self, generation: u64, series: Vec<CostSample>) -> WriteOutcome {
        if self.ordering == CostSeriesOrdering::Generational
            && generation < self.applied_generation
        {
            return WriteOutcome::Stale;
        }
        self.applied_generation = self.applied_generation.max(generation);
        self.view.cost_series = series;
        WriteOutcome::Applied(Slice::CostSeries)
    }

    fn write(&mut self, update: SliceUpdate) -> WriteOutcome {
        match update {
            SliceUpdate::CostSeries(series) => {
                let generation = self.reserve();
                self.write_cost_series(generation, series)
            }
            other => {
                let slice = other.slice();
                self.view.replace(other);
                WriteOutcome::Applied(slice)
            }
        }
    }
}

// ============================================================================
// View Model Store
// ============================================================================

/// Shared, observable container for the dashboard's [`ViewModel`].
///
/// Created empty and mounted. After [`dispose`](Self::dispose) every write is
/// a no-op that reports [`WriteOutcome::Unmounted`].
pub struct ViewModelStore {
    inner: Arc<RwLock<ViewModelInner>>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl Default for ViewModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModelStore {
    /// Creates an empty, mounted store with last-write-wins ordering.
    pub fn new() -> Self {
        Self::with_ordering(CostSeriesOrdering::default())
    }

    /// Creates an empty, mounted store with the given cost-series ordering.
    pub fn with_ordering(ordering: CostSeriesOrdering) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(ViewModelInner::new(ordering))),
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns a copy of the current view model.
    pub async fn snapshot(&self) -> ViewModel {
        self.inner.read().await.view.clone()
    }

    /// Returns the initial-load status.
    pub async fn status(&self) -> LoadStatus {
        self.inner.read().await.view.status.clone()
    }

    /// Returns false once the store has been disposed.
    pub async fn is_mounted(&self) -> bool {
        self.inner.read().await.mounted
    }

    /// The cost-series ordering mode.
    pub async fn ordering(&self) -> CostSeriesOrdering {
        self.inner.read().await.ordering
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replaces one slice wholesale.
    pub async fn set_slice(&self, update: SliceUpdate) -> WriteOutcome {
        let slice = update.slice();
        let outcome = {
            let mut inner = self.inner.write().await;
            if !inner.mounted {
                WriteOutcome::Unmounted
            } else {
                inner.write(update)
            }
        };
        self.after_write(slice, outcome).await
    }

    /// Applies a push message to the slice it names.
    ///
    /// Unrecognized message types are ignored.
    pub async fn patch_slice(&self, message: PushMessage) -> WriteOutcome {
        let update = match message {
            PushMessage::CloudCosts(series) => SliceUpdate::CostSeries(series),
            PushMessage::ServiceUsage(usage) => SliceUpdate::ServiceUsage(usage),
            PushMessage::Unknown(kind) => {
                debug!(kind = %kind, "Ignoring push message of unknown type");
                return WriteOutcome::Ignored;
            }
        };
        self.set_slice(update).await
    }

    /// Reserves a cost-series generation for a write issued now.
    ///
    /// Returns `None` once the store has been disposed.
    pub async fn reserve_generation(&self) -> Option<u64> {
        let mut inner = self.inner.write().await;
        if inner.mounted {
            Some(inner.reserve())
        } else {
            None
        }
    }

    /// Replaces the cost series with a result issued at `generation`.
    pub async fn set_cost_series(&self, generation: u64, series: Vec<CostSample>) -> WriteOutcome {
        let outcome = {
            let mut inner = self.inner.write().await;
            if inner.mounted {
                inner.write_cost_series(generation, series)
            } else {
                WriteOutcome::Unmounted
            }
        };
        self.after_write(Slice::CostSeries, outcome).await
    }

    // ========================================================================
    // Initial Load
    // ========================================================================

    /// Marks the initial load as in flight and reserves its cost-series
    /// generation.
    ///
    /// Returns `None` once the store has been disposed.
    pub async fn begin_loading(&self) -> Option<u64> {
        let generation = {
            let mut inner = self.inner.write().await;
            if !inner.mounted {
                return None;
            }
            inner.view.status = LoadStatus::Loading;
            inner.reserve()
        };
        self.notify_change().await;
        Some(generation)
    }

    /// Assigns all initial-load slices together and marks the view ready.
    ///
    /// Returns false if the store was disposed before the result arrived.
    pub async fn populate(&self, generation: u64, updates: Vec<SliceUpdate>) -> bool {
        {
            let mut inner = self.inner.write().await;
            if !inner.mounted {
                debug!("Dropping initial load result, store disposed");
                return false;
            }
            for update in updates {
                match update {
                    SliceUpdate::CostSeries(series) => {
                        if inner.write_cost_series(generation, series) == WriteOutcome::Stale {
                            debug!(generation, "Initial cost series superseded");
                        }
                    }
                    other => inner.view.replace(other),
                }
            }
            inner.view.status = LoadStatus::Ready;
        }
        self.notify_change().await;
        info!("Initial load applied");
        true
    }

    /// Marks the initial load as failed. Slices are left untouched.
    ///
    /// Returns false if the store was disposed before the failure arrived.
    pub async fn fail_load(&self, message: String) -> bool {
        {
            let mut inner = self.inner.write().await;
            if !inner.mounted {
                return false;
            }
            inner.view.status = LoadStatus::Failed(message);
        }
        self.notify_change().await;
        true
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Tears the store down. All later writes are no-ops.
    pub async fn dispose(&self) {
        let was_mounted = {
            let mut inner = self.inner.write().await;
            std::mem::replace(&mut inner.mounted, false)
        };
        if was_mounted {
            info!("View model disposed");
            self.notify_change().await;
        }
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Subscribes to store changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn after_write(&self, slice: Slice, outcome: WriteOutcome) -> WriteOutcome {
        match outcome {
            WriteOutcome::Applied(_) => {
                self.notify_change().await;
                debug!(slice = ?slice, "Slice replaced");
            }
            WriteOutcome::Stale => debug!(slice = ?slice, "Discarding stale write"),
            WriteOutcome::Unmounted => debug!(slice = ?slice, "Write after dispose dropped"),
            WriteOutcome::Ignored => {}
        }
        outcome
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use spendboard_core::{ResourceRecord, UsageBreakdown};

    fn series(month: &str, cost: f64) -> Vec<CostSample> {
        vec![CostSample::new(month, cost)]
    }

    #[tokio::test]
    async fn test_new_store_is_empty_and_mounted() {
        let store = ViewModelStore::new();
        assert!(store.snapshot().await.is_empty());
        assert!(store.is_mounted().await);
        assert_eq!(store.status().await, LoadStatus::Idle);
    }

    #[tokio::test]
    async fn test_push_touches_only_named_slice() {
        let store = ViewModelStore::new();
        store
            .set_slice(SliceUpdate::Resources(vec![ResourceRecord::new("db", "RDS", 9.0)]))
            .await;
        store.set_slice(SliceUpdate::CostSeries(series("Jan", 10.0))).await;
        let before = store.snapshot().await;

        let usage = UsageBreakdown::from_pairs([("EC2", 4.0), ("S3", 1.0)]);
        let outcome = store.patch_slice(PushMessage::ServiceUsage(usage.clone())).await;

        let after = store.snapshot().await;
        assert_eq!(outcome, WriteOutcome::Applied(Slice::ServiceUsage));
        assert_eq!(after.service_usage, usage);
        assert_eq!(after.cost_series, before.cost_series);
        assert_eq!(after.daily_costs, before.daily_costs);
        assert_eq!(after.resources, before.resources);
    }

    #[tokio::test]
    async fn test_unknown_push_ignored() {
        let store = ViewModelStore::new();
        let mut rx = store.subscribe();
        let outcome = store.patch_slice(PushMessage::Unknown("alert".into())).await;
        assert_eq!(outcome, WriteOutcome::Ignored);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_last_write_wins_by_default() {
        let store = ViewModelStore::new();
        let range_generation = store.reserve_generation().await.unwrap();

        // Push arrives while the range request is in flight
        store.patch_slice(PushMessage::CloudCosts(series("Push", 2.0))).await;
        let outcome = store.set_cost_series(range_generation, series("Range", 1.0)).await;

        assert!(outcome.is_applied());
        assert_eq!(store.snapshot().await.cost_series[0].month, "Range");
    }

    #[tokio::test]
    async fn test_generational_discards_older_write() {
        let store = ViewModelStore::with_ordering(CostSeriesOrdering::Generational);
        let range_generation = store.reserve_generation().await.unwrap();

        store.patch_slice(PushMessage::CloudCosts(series("Push", 2.0))).await;
        let outcome = store.set_cost_series(range_generation, series("Range", 1.0)).await;

        assert_eq!(outcome, WriteOutcome::Stale);
        assert_eq!(store.snapshot().await.cost_series[0].month, "Push");
    }

    #[tokio::test]
    async fn test_populate_sets_ready() {
        let store = ViewModelStore::new();
        let generation = store.begin_loading().await.unwrap();
        assert!(store.status().await.is_loading());

        store
            .populate(
                generation,
                vec![
                    SliceUpdate::CostSeries(series("Jan", 1.0)),
                    SliceUpdate::Resources(vec![ResourceRecord::new("vm", "EC2", 3.0)]),
                ],
            )
            .await;

        let view = store.snapshot().await;
        assert_eq!(view.status, LoadStatus::Ready);
        assert_eq!(view.cost_series.len(), 1);
        assert_eq!(view.resources.len(), 1);
    }

    #[tokio::test]
    async fn test_fail_load_keeps_slices_empty() {
        let store = ViewModelStore::new();
        store.begin_loading().await.unwrap();
        store.fail_load("resources returned status 500".into()).await;

        let view = store.snapshot().await;
        assert!(view.is_empty());
        assert_eq!(view.status.error(), Some("resources returned status 500"));
    }

    #[tokio::test]
    async fn test_no_writes_after_dispose() {
        let store = ViewModelStore::new();
        store.set_slice(SliceUpdate::CostSeries(series("Jan", 1.0))).await;
        store.dispose().await;
        let frozen = store.snapshot().await;

        assert_eq!(
            store.set_slice(SliceUpdate::CostSeries(series("Feb", 2.0))).await,
            WriteOutcome::Unmounted
        );
        assert_eq!(
            store.patch_slice(PushMessage::ServiceUsage(UsageBreakdown::default())).await,
            WriteOutcome::Unmounted
        );
        assert_eq!(store.set_cost_series(99, vec![]).await, WriteOutcome::Unmounted);
        assert!(!store.fail_load("late".into()).await);
        assert!(!store.populate(1, vec![SliceUpdate::Resources(vec![])]).await);
        assert!(store.begin_loading().await.is_none());
        assert!(store.reserve_generation().await.is_none());

        assert_eq!(store.snapshot().await, frozen);
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let store = ViewModelStore::new();
        let mut rx = store.subscribe();
        store.set_slice(SliceUpdate::Resources(vec![])).await;
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        store.dispose().await;
        assert!(rx.has_changed().unwrap());
    }
}
