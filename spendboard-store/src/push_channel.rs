//! Push channel lifecycle.
//!
//! A [`PushChannel`] owns one background task that reads frames from a
//! [`PushSource`] and dispatches them into the [`ViewModelStore`]. The task is
//! aborted on [`close`](PushChannel::close) and on drop, and every write it
//! makes is additionally guarded by the store's mounted flag.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use spendboard_core::PushMessage;
use spendboard_fetch::{FetchError, PushSource, RetryStrategy};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::view_model::{ViewModelStore, WriteOutcome};

// ============================================================================
// Reconnect Policy
// ============================================================================

/// Whether and how a dead push channel is reopened.
///
/// Disabled by default: after a connection error or a peer close the channel
/// stays dead until the next mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    /// Reconnect at all.
    pub enabled: bool,
    /// Reconnect attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the first reconnect, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

impl ReconnectPolicy {
    /// Bounded exponential reconnects.
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            enabled: true,
            max_attempts,
            ..Self::default()
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Backoff schedule; the initial connection counts as the first attempt.
    pub fn backoff(&self) -> RetryStrategy {
        if !self.enabled {
            return RetryStrategy::no_retry();
        }
        RetryStrategy::new(self.max_attempts.saturating_add(1))
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Decodes one text frame and applies it to the store.
///
/// Frames that are not a valid envelope are logged and ignored.
pub async fn dispatch(store: &ViewModelStore, frame: &str) -> WriteOutcome {
    match PushMessage::parse(frame) {
        Ok(message) => {
            debug!(kind = message.type_name(), "Push message received");
            store.patch_slice(message).await
        }
        Err(e) => {
            warn!(error = %e, "Dropping malformed push frame");
            WriteOutcome::Ignored
        }
    }
}

// ============================================================================
// Push Channel
// ============================================================================

/// Handle to a running push-channel task.
#[derive(Debug)]
pub struct PushChannel {
    task: JoinHandle<()>,
}

impl PushChannel {
    /// Opens the channel on a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        source: Arc<dyn PushSource>,
        store: Arc<ViewModelStore>,
        policy: ReconnectPolicy,
    ) -> Self {
        info!(source = %source.describe(), reconnect = policy.enabled, "Opening push channel");
        let task = tokio::spawn(run(source, store, policy));
        Self { task }
    }

    /// Closes the channel. Safe to call more than once.
    pub fn close(&self) {
        if !self.task.is_finished() {
            debug!("Closing push channel");
        }
        self.task.abort();
    }

    /// Returns true once the channel task has stopped.
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(source: Arc<dyn PushSource>, store: Arc<ViewModelStore>, policy: ReconnectPolicy) {
    let backoff = policy.backoff();
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match source.connect().await {
            Ok(mut frames) => {
                while let Some(frame) = frames.next().await {
                    match frame {
                        Ok(text) => {
                            // A session that delivered data starts a fresh retry budget.
                            attempt = 1;
                            if dispatch(&store, &text).await == WriteOutcome::Unmounted {
                                return;
                            }
                        }
                        Err(FetchError::ChannelClosed) => break,
                        Err(e) => {
                            error!(source = %source.describe(), error = %e, "Push channel error");
                            break;
                        }
                    }
                }
                info!(source = %source.describe(), "Push channel closed");
            }
            Err(e) => {
                error!(source = %source.describe(), error = %e, "Push channel connection failed");
            }
        }

        if !store.is_mounted().await || !backoff.has_attempts_after(attempt) {
            return;
        }

        let delay = backoff.delay_for_attempt(attempt);
        warn!(
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Reconnecting push channel"
        );
        tokio::time::sleep(delay).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
