//! Integration tests for core spend types.

use chrono::NaiveDate;
use spendboard_core::{
    estimate_monthly_cost, format_usd, CoreError, DateRange, EstimatorInputs, PushMessage,
    Slice, SliceUpdate, UsageBreakdown, ViewModel,
};

#[test]
fn test_range_rejects_inverted_dates() {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    assert!(matches!(
        DateRange::new(start, end),
        Err(CoreError::InvalidRange { .. })
    ));
}

#[test]
fn test_estimator_reference_value() {
    let inputs = EstimatorInputs::new(10.0, 24.0, 30.0, 0.10);
    assert_eq!(format_usd(estimate_monthly_cost(&inputs)), "720.00");
}

#[test]
fn test_push_message_applies_to_named_slice_only() {
    let mut view = ViewModel::new();
    let msg = PushMessage::parse(
        r#"{"type":"service_usage","data":{"labels":["EC2","S3"],"data":[2.0,3.0]}}"#,
    )
    .unwrap();

    let PushMessage::ServiceUsage(usage) = msg else {
        panic!("expected service usage");
    };
    view.replace(SliceUpdate::ServiceUsage(usage));

    assert_eq!(view.service_usage, UsageBreakdown::from_pairs([("EC2", 2.0), ("S3", 3.0)]));
    assert!(view.cost_series.is_empty());
    assert!(view.daily_costs.is_empty());
    assert!(view.resources.is_empty());
}

#[test]
fn test_push_message_targets() {
    let costs = PushMessage::parse(r#"{"type":"cloud_costs","data":[]}"#).unwrap();
    assert_eq!(costs.target(), Some(Slice::CostSeries));

    let other = PushMessage::parse(r#"{"type":"forecast","data":null}"#).unwrap();
    assert_eq!(other.target(), None);
}
