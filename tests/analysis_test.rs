// ABOUTME: Integration tests for analyze_training_period, compare_activities and find_similar_activities
// ABOUTME: Runs the analysis tools against scripted activity lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{activity, date, error_kind, recent_runs, run_tool, MockFitnessApi};
use garmin_providers::{ApiCall, ProviderError};
use serde_json::{json, Value};

fn by_id(call: &ApiCall) -> Result<Value, ProviderError> {
    match call {
        ApiCall::Activity(id) => {
            let distance = 5000.0 + *id as f64;
            Ok(activity(*id, "running", distance, 1500.0, "2024-01-10"))
        }
        _ => Ok(Value::Null),
    }
}

#[tokio::test]
async fn test_period_analysis_totals() {
    let api = Arc::new(MockFitnessApi::new().with_activities(recent_runs(4)));

    let envelope = run_tool(&api, "analyze_training_period", json!({"period": "7d"})).await;

    let summary = &envelope["data"]["summary"];
    assert_eq!(summary["total_activities"], 4);
    assert_eq!(envelope["data"]["period"]["start_date"], "2024-01-09");
    assert_eq!(envelope["data"]["period"]["end_date"], "2024-01-15");
    assert_eq!(envelope["data"]["by_activity_type"][0]["type"], "running");
    assert!(envelope["analysis"]["insights"].is_array());
    assert_eq!(envelope["metadata"]["activity_type"], "all");

    match &api.calls_to("get_activities")[0] {
        ApiCall::SearchActivities {
            start,
            start_date,
            end_date,
            ..
        } => {
            assert_eq!(*start, 0);
            assert_eq!(*start_date, Some(date("2024-01-09")));
            assert_eq!(*end_date, Some(date("2024-01-15")));
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn test_period_analysis_defaults_to_thirty_days() {
    let api = Arc::new(MockFitnessApi::new().with_activities(Vec::new()));

    let envelope = run_tool(&api, "analyze_training_period", json!({})).await;

    assert_eq!(envelope["data"]["summary"]["total_activities"], 0);
    assert_eq!(envelope["data"]["period"]["days"], 30);
    assert_eq!(envelope["data"]["period"]["start_date"], "2023-12-17");
}

#[tokio::test]
async fn test_period_analysis_surfaces_api_failure() {
    let api = Arc::new(MockFitnessApi::new().unauthorized("get_activities"));

    let envelope = run_tool(&api, "analyze_training_period", json!({"period": "7d"})).await;

    assert_eq!(error_kind(&envelope), Some("authentication_error"));
    assert!(envelope["error"]["suggestions"].is_array());
}

#[tokio::test]
async fn test_compare_accepts_string_and_array_ids() {
    let api = Arc::new(MockFitnessApi::new().respond_with("get_activity", by_id));

    let from_string = run_tool(&api, "compare_activities", json!({"activity_ids": "1, 2, 3"})).await;
    assert_eq!(from_string["data"]["count"], 3);

    let from_array = run_tool(&api, "compare_activities", json!({"activity_ids": [4, 5]})).await;
    assert_eq!(from_array["data"]["count"], 2);
    assert_eq!(from_array["metadata"]["activity_ids"], json!([4, 5]));
}

#[tokio::test]
async fn test_compare_rejects_bad_id_counts() {
    let api = Arc::new(MockFitnessApi::new().respond_with("get_activity", by_id));

    let one = run_tool(&api, "compare_activities", json!({"activity_ids": "1"})).await;
    assert_eq!(error_kind(&one), Some("invalid_argument"));

    let six = run_tool(&api, "compare_activities", json!({"activity_ids": "1,2,3,4,5,6"})).await;
    assert_eq!(error_kind(&six), Some("invalid_argument"));

    let bad = run_tool(&api, "compare_activities", json!({"activity_ids": "1,abc"})).await;
    assert_eq!(error_kind(&bad), Some("invalid_argument"));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_compare_skips_missing_activities() {
    let api = Arc::new(MockFitnessApi::new().respond_with("get_activity", |call| match call {
        ApiCall::Activity(3) => Err(ProviderError::NotFound {
            provider: "garmin".to_owned(),
            resource: "Activity 3".to_owned(),
        }),
        other => by_id(other),
    }));

    let envelope = run_tool(&api, "compare_activities", json!({"activity_ids": "1,2,3"})).await;
    assert_eq!(envelope["data"]["count"], 2);

    let too_few = run_tool(&api, "compare_activities", json!({"activity_ids": "1,3"})).await;
    assert_eq!(error_kind(&too_few), Some("insufficient_data"));
}

#[tokio::test]
async fn test_similar_excludes_reference() {
    let mut candidates = recent_runs(5);
    candidates.push(activity(77, "cycling", 40_000.0, 5400.0, "2024-01-03"));
    let reference = candidates[0].clone();
    let reference_id = reference["activityId"].as_u64().unwrap();
    let api = Arc::new(
        MockFitnessApi::new()
            .respond("get_activity", reference)
            .with_activities(candidates),
    );

    let envelope = run_tool(
        &api,
        "find_similar_activities",
        json!({"activity_id": reference_id, "limit": 3}),
    )
    .await;

    let similar = envelope["data"]["similar_activities"].as_array().unwrap();
    assert!(similar.len() <= 3);
    assert!(!similar.is_empty());
    for entry in similar {
        assert_ne!(entry["activity"]["activityId"].as_u64(), Some(reference_id));
        assert_eq!(entry["activity"]["activityType"]["typeKey"], "running");
    }
    assert_eq!(envelope["metadata"]["criteria"], json!(["type", "distance"]));
}

#[tokio::test]
async fn test_similar_limit_bounds() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(
        &api,
        "find_similar_activities",
        json!({"activity_id": 1, "limit": 50}),
    )
    .await;

    assert_eq!(error_kind(&envelope), Some("invalid_argument"));
    assert!(api.calls().is_empty());
}
