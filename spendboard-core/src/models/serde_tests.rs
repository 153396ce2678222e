//! Serde wire-format tests for core types.
//!
//! These tests pin the JSON shapes exchanged with the dashboard backend.

use serde_json::json;

use crate::{
    CostEstimate, CostSample, EstimatorInputs, LoadStatus, ResourceRecord, Slice,
    UsageBreakdown, ViewModel,
};

// ============================================================================
// Backend Payloads
// ============================================================================

#[test]
fn test_cost_series_payload() {
    let payload = json!([
        {"month": "2024-01", "cost": 1200.5},
        {"month": "2024-02", "cost": 980.0}
    ]);
    let series: Vec<CostSample> = serde_json::from_value(payload).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[1], CostSample::new("2024-02", 980.0));
}

#[test]
fn test_cost_sample_integer_cost() {
    // Backends commonly emit whole numbers without a fraction
    let sample: CostSample = serde_json::from_str(r#"{"month":"Mar","cost":300}"#).unwrap();
    assert_eq!(sample.cost, 300.0);
}

#[test]
fn test_cost_sample_missing_cost_rejected() {
    let result: Result<CostSample, _> = serde_json::from_str(r#"{"month":"Mar"}"#);
    assert!(result.is_err());
}

#[test]
fn test_usage_breakdown_payload() {
    let payload = json!({"labels": ["EC2", "S3", "RDS"], "data": [50, 30.5, 19.5]});
    let usage: UsageBreakdown = serde_json::from_value(payload).unwrap();
    assert!(usage.validate().is_ok());
    assert_eq!(usage.total(), 100.0);
}

#[test]
fn test_resource_payload() {
    let payload = json!([{"name": "api-server", "type": "EC2", "cost": 95.25}]);
    let resources: Vec<ResourceRecord> = serde_json::from_value(payload).unwrap();
    assert_eq!(resources[0].kind, "EC2");
}

#[test]
fn test_estimate_request_body() {
    let body = serde_json::to_value(EstimatorInputs::new(10.0, 24.0, 30.0, 0.1)).unwrap();
    assert_eq!(
        body,
        json!({
            "instanceCount": 10.0,
            "hoursPerDay": 24.0,
            "daysPerMonth": 30.0,
            "costPerHour": 0.1
        })
    );
}

#[test]
fn test_estimate_response_body() {
    let estimate: CostEstimate =
        serde_json::from_value(json!({"estimatedMonthlyCost": 720})).unwrap();
    assert_eq!(estimate.estimated_monthly_cost, 720.0);
}

// ============================================================================
// Client-side Types
// ============================================================================

#[test]
fn test_load_status_shape() {
    let failed = serde_json::to_value(LoadStatus::Failed("timeout".into())).unwrap();
    assert_eq!(failed, json!({"state": "failed", "message": "timeout"}));

    let ready = serde_json::to_value(LoadStatus::Ready).unwrap();
    assert_eq!(ready, json!({"state": "ready"}));
}

#[test]
fn test_view_model_keys() {
    let value = serde_json::to_value(ViewModel::new()).unwrap();
    for key in ["costSeries", "serviceUsage", "dailyCosts", "resources", "status"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn test_slice_names() {
    assert_eq!(serde_json::to_value(Slice::CostSeries).unwrap(), json!("cost_series"));
    assert_eq!(serde_json::to_value(Slice::DailyCosts).unwrap(), json!("daily_costs"));
}
