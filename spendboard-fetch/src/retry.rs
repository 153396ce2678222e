//! Retry and reconnect backoff.
//!
//! The dashboard's baseline contract is "no retries": a failed request is
//! reported once and a dead push channel stays dead. [`RetryStrategy::no_retry`]
//! is therefore the default everywhere; bounded exponential backoff is opt-in.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FetchError;

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryStrategy {
    /// Total attempts including the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Double the delay after every failed attempt.
    pub exponential_backoff: bool,
}

impl RetryStrategy {
    /// Creates a strategy with `max_attempts` total attempts.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            exponential_backoff: true,
        }
    }

    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
            exponential_backoff: false,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enables or disables exponential backoff.
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Returns true if more than one attempt is allowed.
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Returns true if attempt number `attempt` (1-based) may be followed by another.
    pub fn has_attempts_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
            self.base_delay_ms.saturating_mul(factor)
        } else {
            self.base_delay_ms
        };

        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Determines if an error should be retried.
    pub fn should_retry(&self, error: &FetchError) -> bool {
        error.is_transient()
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::no_retry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_attempt() {
        let strategy = RetryStrategy::default();
        assert!(!strategy.is_enabled());
        assert!(!strategy.has_attempts_after(1));
    }

    #[test]
    fn test_exponential_backoff() {
        let strategy = RetryStrategy::new(5);

        assert_eq!(strategy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(strategy.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(strategy.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(strategy.delay_for_attempt(4), Duration::from_secs(8));
    }

    #[test]
    fn test_max_delay_cap() {
        let strategy = RetryStrategy::new(10).with_base_delay(Duration::from_secs(10));

        // Capped at 30 seconds
        assert_eq!(strategy.delay_for_attempt(5), Duration::from_secs(30));
        // Large attempt numbers must not overflow
        assert_eq!(strategy.delay_for_attempt(200), Duration::from_secs(30));
    }

    #[test]
    fn test_constant_delay() {
        let strategy = RetryStrategy::new(3)
            .with_base_delay(Duration::from_millis(250))
            .with_exponential_backoff(false);
        assert_eq!(strategy.delay_for_attempt(3), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryStrategy::new(0).max_attempts, 1);
    }
}
