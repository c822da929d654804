// ABOUTME: Integration tests for performance metrics, training effect and training status tools
// ABOUTME: Each sub-metric failure must degrade to null while the rest of the response renders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{date, error_kind, run_tool, MockFitnessApi};
use garmin_providers::ApiCall;
use serde_json::json;

#[tokio::test]
async fn test_single_date_metrics_isolate_failures() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond(
                "get_max_metrics",
                json!([{"generic": {"vo2MaxPreciseValue": 51.8}, "cycling": null}]),
            )
            .api_error("get_hrv_data", 500)
            .respond("get_fitness_age", json!({"fitnessAge": 31})),
    );

    let envelope = run_tool(&api, "get_performance_metrics", json!({})).await;

    assert_eq!(envelope["metadata"]["mode"], "single_date");
    assert_eq!(envelope["data"]["date"], "2024-01-15");
    assert_eq!(envelope["data"]["vo2_max"]["running"], 51.8);
    assert!(envelope["data"]["hrv"].is_null());
    assert_eq!(envelope["data"]["fitness_age"]["fitnessAge"], 31);
    assert_eq!(
        envelope["analysis"]["insights"][0],
        "Available performance metrics: vo2_max, fitness_age"
    );
}

#[tokio::test]
async fn test_range_metrics_use_scores() {
    let api = Arc::new(MockFitnessApi::new().respond("get_hill_score", json!({"overallScore": 60})));

    let envelope = run_tool(
        &api,
        "get_performance_metrics",
        json!({"start_date": "2024-01-01", "end_date": "2024-01-14", "include_endurance_score": false}),
    )
    .await;

    assert_eq!(envelope["metadata"]["mode"], "range");
    assert_eq!(envelope["data"]["hill_score"]["overallScore"], 60);
    assert!(envelope["data"].get("endurance_score").is_none());
    assert_eq!(
        api.calls(),
        vec![ApiCall::HillScore {
            start: date("2024-01-01"),
            end: date("2024-01-14"),
        }]
    );
}

#[tokio::test]
async fn test_all_metrics_missing_still_succeeds() {
    let api = Arc::new(
        MockFitnessApi::new()
            .not_found("get_max_metrics")
            .not_found("get_hrv_data")
            .not_found("get_fitness_age"),
    );

    let envelope = run_tool(&api, "get_performance_metrics", json!({"date": "2024-01-10"})).await;

    assert!(error_kind(&envelope).is_none());
    assert_eq!(
        envelope["analysis"]["insights"][0],
        "No performance metrics available for this period"
    );
}

#[tokio::test]
async fn test_training_effect_for_activity() {
    let api = Arc::new(MockFitnessApi::new().respond(
        "get_activity",
        json!({
            "activityId": 12,
            "activityName": "Tempo",
            "summaryDTO": {
                "aerobicTrainingEffect": 3.4,
                "anaerobicTrainingEffect": 1.2,
                "trainingEffectLabel": "TEMPO",
            },
        }),
    ));

    let envelope = run_tool(&api, "get_training_effect", json!({"activity_id": 12})).await;

    assert_eq!(envelope["metadata"]["mode"], "activity");
    assert_eq!(envelope["data"]["training_effect"]["aerobic"], 3.4);
    assert_eq!(envelope["data"]["activity_name"], "Tempo");
    assert_eq!(envelope["analysis"]["insights"][0], "Training effect: tempo");
}

#[tokio::test]
async fn test_training_effect_progress_summary() {
    let api = Arc::new(MockFitnessApi::new().respond(
        "get_progress_summary_between_dates",
        json!([{"date": "2024-01-01", "countOfActivities": 4}]),
    ));

    let envelope = run_tool(
        &api,
        "get_training_effect",
        json!({"start_date": "2024-01-01", "end_date": "2024-01-15"}),
    )
    .await;

    assert_eq!(envelope["metadata"]["mode"], "progress_summary");
    assert_eq!(envelope["data"]["metric"], "distance");
    assert_eq!(
        api.calls(),
        vec![ApiCall::ProgressSummary {
            start: date("2024-01-01"),
            end: date("2024-01-15"),
            metric: "distance".to_owned(),
        }]
    );
}

#[tokio::test]
async fn test_training_effect_needs_activity_or_range() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(&api, "get_training_effect", json!({})).await;

    assert_eq!(error_kind(&envelope), Some("invalid_argument"));
    assert_eq!(envelope["error"]["suggestions"].as_array().unwrap().len(), 2);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_training_status_readiness_insight() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond(
                "get_training_readiness",
                json!([{"score": 71, "level": "HIGH", "feedbackShort": "WELL_RECOVERED"}]),
            )
            .respond(
                "get_training_status",
                json!({"mostRecentTrainingStatus": {"latestTrainingStatusData": {}}}),
            ),
    );

    let envelope = run_tool(&api, "get_training_status", json!({"date": "yesterday"})).await;

    assert_eq!(envelope["data"]["date"], "2024-01-14");
    assert_eq!(envelope["data"]["training_readiness"]["score"], 71);
    assert!(envelope["data"]["training_status"]["latestTrainingStatusData"].is_object());
    assert_eq!(envelope["analysis"]["insights"][0], "Training readiness: 71 (high)");
}

#[tokio::test]
async fn test_training_status_without_data() {
    let api = Arc::new(
        MockFitnessApi::new()
            .api_error("get_training_readiness", 500)
            .api_error("get_training_status", 500),
    );

    let envelope = run_tool(&api, "get_training_status", json!({})).await;

    assert!(envelope["data"]["training_readiness"].is_null());
    assert!(envelope["data"]["training_status"].is_null());
    assert_eq!(
        envelope["analysis"]["insights"][0],
        "No training status data available for this date"
    );
}
