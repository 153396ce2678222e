//! Shared test doubles for reconciliation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use spendboard_core::{
    CostEstimate, CostSample, DailyCostBreakdown, DateRange, EstimatorInputs, ResourceRecord,
    SliceUpdate, UsageBreakdown, ViewModel,
};
use spendboard_fetch::{DashboardApi, Endpoint, FetchError, FrameStream, PushSource};
use spendboard_store::ViewModelStore;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Backend
// ============================================================================

/// In-memory backend with per-endpoint failures and optional gates.
#[derive(Default)]
pub struct MockApi {
    pub costs: Vec<CostSample>,
    pub usage: UsageBreakdown,
    pub daily: DailyCostBreakdown,
    pub resources: Vec<ResourceRecord>,
    pub filtered: Vec<CostSample>,
    pub estimate_override: Option<f64>,
    pub failing: Mutex<HashSet<Endpoint>>,
    /// Notified when a filtered request has been issued.
    pub filtered_issued: Notify,
    /// When set, filtered requests wait for a permit before answering.
    pub filtered_gate: Option<Notify>,
    /// When set, the resources read waits for a permit before answering.
    pub load_gate: Option<Notify>,
    pub filtered_calls: AtomicUsize,
    pub commits: Mutex<Vec<SliceUpdate>>,
}

impl MockApi {
    pub fn seeded() -> Self {
        Self {
            costs: vec![CostSample::new("Jan", 1000.0), CostSample::new("Feb", 1100.0)],
            usage: UsageBreakdown::from_pairs([("EC2", 50.0), ("S3", 30.0), ("RDS", 20.0)]),
            daily: UsageBreakdown::from_pairs([("Mon", 31.0), ("Tue", 29.5)]),
            resources: vec![
                ResourceRecord::new("web-1", "EC2", 72.0),
                ResourceRecord::new("assets", "S3", 12.5),
            ],
            filtered: vec![CostSample::new("Feb", 1100.0)],
            ..Self::default()
        }
    }

    pub fn failing_on(self, endpoint: Endpoint) -> Self {
        self.failing.lock().unwrap().insert(endpoint);
        self
    }

    pub fn with_filtered_gate(mut self) -> Self {
        self.filtered_gate = Some(Notify::new());
        self
    }

    pub fn with_load_gate(mut self) -> Self {
        self.load_gate = Some(Notify::new());
        self
    }

    fn check(&self, endpoint: Endpoint) -> Result<(), FetchError> {
        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(FetchError::Status {
                endpoint: endpoint.path().to_string(),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for MockApi {
    async fn cost_series(&self) -> Result<Vec<CostSample>, FetchError> {
        self.check(Endpoint::CloudCosts)?;
        Ok(self.costs.clone())
    }

    async fn service_usage(&self) -> Result<UsageBreakdown, FetchError> {
        self.check(Endpoint::ServiceUsage)?;
        Ok(self.usage.clone())
    }

    async fn daily_costs(&self) -> Result<DailyCostBreakdown, FetchError> {
        self.check(Endpoint::DailyCosts)?;
        Ok(self.daily.clone())
    }

    async fn resources(&self) -> Result<Vec<ResourceRecord>, FetchError> {
        if let Some(gate) = &self.load_gate {
            gate.notified().await;
        }
        self.check(Endpoint::Resources)?;
        Ok(self.resources.clone())
    }

    async fn filtered_costs(&self, _range: &DateRange) -> Result<Vec<CostSample>, FetchError> {
        self.filtered_calls.fetch_add(1, Ordering::SeqCst);
        self.filtered_issued.notify_one();
        if let Some(gate) = &self.filtered_gate {
            gate.notified().await;
        }
        self.check(Endpoint::FilteredCosts)?;
        Ok(self.filtered.clone())
    }

    async fn estimate_cost(&self, inputs: &EstimatorInputs) -> Result<CostEstimate, FetchError> {
        self.check(Endpoint::EstimateCost)?;
        Ok(CostEstimate {
            estimated_monthly_cost: self.estimate_override.unwrap_or_else(|| inputs.monthly_cost()),
        })
    }

    async fn update_cloud_costs(&self, series: &[CostSample]) -> Result<(), FetchError> {
        self.check(Endpoint::UpdateCloudCosts)?;
        self.commits
            .lock()
            .unwrap()
            .push(SliceUpdate::CostSeries(series.to_vec()));
        Ok(())
    }

    async fn update_service_usage(&self, usage: &UsageBreakdown) -> Result<(), FetchError> {
        self.check(Endpoint::UpdateServiceUsage)?;
        self.commits
            .lock()
            .unwrap()
            .push(SliceUpdate::ServiceUsage(usage.clone()));
        Ok(())
    }
}

// ============================================================================
// Channel Push Source
// ============================================================================

/// Push source fed from an in-process channel. Connects once.
pub struct ChannelSource {
    frames: Mutex<Option<UnboundedReceiver<Result<String, FetchError>>>>,
    pub connects: AtomicUsize,
}

impl ChannelSource {
    pub fn new() -> (Self, UnboundedSender<Result<String, FetchError>>) {
        let (tx, rx) = mpsc::unbounded();
        let source = Self {
            frames: Mutex::new(Some(rx)),
            connects: AtomicUsize::new(0),
        };
        (source, tx)
    }

    /// A source whose every connection attempt fails.
    pub fn refusing() -> Self {
        Self {
            frames: Mutex::new(None),
            connects: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PushSource for ChannelSource {
    async fn connect(&self) -> Result<FrameStream, FetchError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let frames = self.frames.lock().unwrap().take();
        frames.map(|rx| rx.boxed()).ok_or(FetchError::ChannelClosed)
    }

    fn describe(&self) -> String {
        "channel://test".to_string()
    }
}

/// Push source that accepts every connection and closes it before any frame.
#[derive(Default)]
pub struct HangupSource {
    pub connects: AtomicUsize,
}

#[async_trait]
impl PushSource for HangupSource {
    async fn connect(&self) -> Result<FrameStream, FetchError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(futures::stream::once(async { Err(FetchError::ChannelClosed) }).boxed())
    }

    fn describe(&self) -> String {
        "hangup://test".to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn costs_frame(month: &str, cost: f64) -> Result<String, FetchError> {
    Ok(format!(
        r#"{{"type":"cloud_costs","data":[{{"month":"{month}","cost":{cost}}}]}}"#
    ))
}

pub fn usage_frame(label: &str, value: f64) -> Result<String, FetchError> {
    Ok(format!(
        r#"{{"type":"service_usage","data":{{"labels":["{label}"],"data":[{value}]}}}}"#
    ))
}

/// Waits until `predicate` holds for the store's view model.
pub async fn wait_for<F>(store: &ViewModelStore, predicate: F)
where
    F: Fn(&ViewModel) -> bool,
{
    let mut changes = store.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if predicate(&store.snapshot().await) {
                return;
            }
            if changes.changed().await.is_err() {
                return;
            }
        }
    })
    .await
    .expect("condition not reached in time");
}
