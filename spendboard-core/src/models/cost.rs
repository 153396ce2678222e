//! Cost series and resource inventory types.
//!
//! - [`CostSample`] - One month of spend in the cost trend
//! - [`ResourceRecord`] - One row of the resource tracker

use serde::{Deserialize, Serialize};

// ============================================================================
// Cost Sample
// ============================================================================

/// A single point in the monthly cost trend.
///
/// `month` is expected to be unique within a series and `cost` non-negative,
/// but neither is enforced: the backend owns those invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSample {
    /// Month label as sent by the backend (e.g. "2024-03" or "Mar").
    pub month: String,
    /// Spend for the month in USD.
    pub cost: f64,
}

impl CostSample {
    /// Creates a new sample.
    pub fn new(month: impl Into<String>, cost: f64) -> Self {
        Self {
            month: month.into(),
            cost,
        }
    }
}

/// Returns the summed cost of a series.
pub fn series_total(series: &[CostSample]) -> f64 {
    series.iter().map(|s| s.cost).sum()
}

/// Splits a series into chart labels and values, preserving order.
pub fn series_points(series: &[CostSample]) -> (Vec<&str>, Vec<f64>) {
    series.iter().map(|s| (s.month.as_str(), s.cost)).unzip()
}

/// Returns the most expensive month in a series.
pub fn series_peak(series: &[CostSample]) -> Option<&CostSample> {
    series.iter().max_by(|a, b| a.cost.total_cmp(&b.cost))
}

// ============================================================================
// Resource Record
// ============================================================================

/// A tracked cloud resource and its cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Resource name.
    pub name: String,
    /// Resource type (e.g. "EC2", "S3").
    #[serde(rename = "type")]
    pub kind: String,
    /// Cost in USD.
    pub cost: f64,
}

impl ResourceRecord {
    /// Creates a new resource record.
    pub fn new(name: impl Into<String>, kind: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            cost,
        }
    }
}

/// Returns the summed cost of all resources.
pub fn resources_total(resources: &[ResourceRecord]) -> f64 {
    resources.iter().map(|r| r.cost).sum()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_total() {
        let series = vec![CostSample::new("Jan", 100.0), CostSample::new("Feb", 250.5)];
        assert_eq!(series_total(&series), 350.5);
        assert_eq!(series_total(&[]), 0.0);
    }

    #[test]
    fn test_series_points_keep_order() {
        let series = vec![CostSample::new("Jan", 1.0), CostSample::new("Feb", 2.0)];
        let (labels, values) = series_points(&series);
        assert_eq!(labels, vec!["Jan", "Feb"]);
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_series_peak() {
        let series = vec![
            CostSample::new("Jan", 10.0),
            CostSample::new("Feb", 30.0),
            CostSample::new("Mar", 20.0),
        ];
        assert_eq!(series_peak(&series).map(|s| s.month.as_str()), Some("Feb"));
        assert!(series_peak(&[]).is_none());
    }

    #[test]
    fn test_resource_type_field_name() {
        let json = r#"{"name":"web-1","type":"EC2","cost":42.5}"#;
        let record: ResourceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, "EC2");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["type"], "EC2");
    }

    #[test]
    fn test_resources_total() {
        let resources = vec![
            ResourceRecord::new("web-1", "EC2", 42.5),
            ResourceRecord::new("bucket", "S3", 7.25),
        ];
        assert_eq!(resources_total(&resources), 49.75);
    }
}
