//! Labeled breakdown types.
//!
//! Both the service-usage breakdown and the daily-cost breakdown share the
//! same wire shape: two index-aligned arrays.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Usage Breakdown
// ============================================================================

/// Index-aligned labels and values.
///
/// `labels[i]` names `data[i]`. The lengths are expected to match; use
/// [`UsageBreakdown::validate`] to check a payload before trusting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageBreakdown {
    /// Category labels (service names, days).
    #[serde(default)]
    pub labels: Vec<String>,
    /// Values, one per label.
    #[serde(default)]
    pub data: Vec<f64>,
}

/// Daily cost variation. Same shape as the service-usage breakdown.
pub type DailyCostBreakdown = UsageBreakdown;

impl UsageBreakdown {
    /// Creates a breakdown from parallel vectors.
    pub fn new(labels: Vec<String>, data: Vec<f64>) -> Self {
        Self { labels, data }
    }

    /// Builds a breakdown from `(label, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (labels, data) = pairs.into_iter().map(|(l, v)| (l.into(), v)).unzip();
        Self { labels, data }
    }

    /// Number of entries (the shorter of the two arrays).
    pub fn len(&self) -> usize {
        self.labels.len().min(self.data.len())
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks the `len(labels) == len(data)` invariant.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.labels.len() == self.data.len() {
            Ok(())
        } else {
            Err(CoreError::InvalidData(format!(
                "breakdown has {} labels but {} values",
                self.labels.len(),
                self.data.len()
            )))
        }
    }

    /// Iterates over `(label, value)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }

    /// Looks up the value for a label.
    pub fn value_of(&self, label: &str) -> Option<f64> {
        self.entries().find(|(l, _)| *l == label).map(|(_, v)| v)
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Share of each entry in the total, as a percentage.
    ///
    /// Returns all zeros when the total is zero.
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        self.entries()
            .map(|(label, value)| {
                let pct = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                (label, pct)
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_matching_lengths() {
        let breakdown = UsageBreakdown::from_pairs([("EC2", 40.0), ("S3", 60.0)]);
        assert!(breakdown.validate().is_ok());
        assert_eq!(breakdown.len(), 2);
    }

    #[test]
    fn test_validate_mismatched_lengths() {
        let breakdown = UsageBreakdown::new(vec!["EC2".into()], vec![1.0, 2.0]);
        assert!(breakdown.validate().is_err());
        // Entries only cover the aligned prefix
        assert_eq!(breakdown.entries().count(), 1);
    }

    #[test]
    fn test_shares() {
        let breakdown = UsageBreakdown::from_pairs([("EC2", 25.0), ("S3", 75.0)]);
        let shares = breakdown.shares();
        assert_eq!(shares, vec![("EC2", 25.0), ("S3", 75.0)]);
    }

    #[test]
    fn test_shares_zero_total() {
        let breakdown = UsageBreakdown::from_pairs([("EC2", 0.0)]);
        assert_eq!(breakdown.shares(), vec![("EC2", 0.0)]);
    }

    #[test]
    fn test_value_of() {
        let breakdown = UsageBreakdown::from_pairs([("EC2", 25.0), ("S3", 75.0)]);
        assert_eq!(breakdown.value_of("S3"), Some(75.0));
        assert_eq!(breakdown.value_of("RDS"), None);
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let breakdown: UsageBreakdown = serde_json::from_str("{}").unwrap();
        assert!(breakdown.is_empty());
    }
}
