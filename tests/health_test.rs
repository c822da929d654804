// ABOUTME: Integration tests for get_daily_health and get_daily_steps
// ABOUTME: Checks per-metric fault isolation and day-based pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{date, error_kind, run_tool, MockFitnessApi};
use garmin_providers::ApiCall;
use serde_json::json;

fn summary() -> serde_json::Value {
    json!({
        "totalSteps": 11_250,
        "dailyStepGoal": 10_000,
        "restingHeartRate": 52,
        "averageStressLevel": 31,
    })
}

#[tokio::test]
async fn test_single_day_defaults_to_today() {
    let api = Arc::new(MockFitnessApi::new().respond("get_user_summary", summary()));

    let envelope = run_tool(&api, "get_daily_health", json!({"metrics": "summary"})).await;

    assert_eq!(envelope["data"]["date"], "2024-01-15");
    assert_eq!(envelope["data"]["summary"]["steps"], 11_250);
    assert_eq!(envelope["data"]["summary"]["resting_heart_rate"], 52);
    assert!(envelope.get("pagination").is_none());
    assert_eq!(api.calls(), vec![ApiCall::UserSummary(date("2024-01-15"))]);
}

#[tokio::test]
async fn test_failed_metric_is_null_without_hiding_others() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond("get_user_summary", summary())
            .api_error("get_sleep_data", 500)
            .unauthorized("get_hrv_data"),
    );

    let envelope = run_tool(
        &api,
        "get_daily_health",
        json!({"date": "2024-01-14", "metrics": ["summary", "sleep", "hrv"]}),
    )
    .await;

    assert!(error_kind(&envelope).is_none());
    assert!(envelope["data"]["sleep"].is_null());
    assert!(envelope["data"]["hrv"].is_null());
    assert_eq!(envelope["data"]["summary"]["steps"], 11_250);
    assert!(envelope["data"].get("stress").is_none());
}

#[tokio::test]
async fn test_unknown_metric_rejected() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(&api, "get_daily_health", json!({"metrics": "mood,sleep"})).await;

    assert_eq!(error_kind(&envelope), Some("invalid_argument"));
    assert!(envelope["error"]["suggestions"].is_array());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_range_pages_by_day_newest_first() {
    let api = Arc::new(MockFitnessApi::new().respond("get_user_summary", summary()));

    let first = run_tool(
        &api,
        "get_daily_health",
        json!({"period": "10d", "metrics": "summary"}),
    )
    .await;

    assert_eq!(first["data"]["count"], 7);
    assert_eq!(first["data"]["days"][0]["date"], "2024-01-15");
    assert_eq!(first["data"]["days"][6]["date"], "2024-01-09");
    assert_eq!(first["pagination"]["has_more"], true);
    assert_eq!(api.calls_to("get_user_summary").len(), 7);

    let cursor = first["pagination"]["cursor"].as_str().unwrap().to_owned();
    let second = run_tool(&api, "get_daily_health", json!({"cursor": cursor})).await;

    assert_eq!(second["data"]["count"], 3);
    assert_eq!(second["data"]["days"][0]["date"], "2024-01-08");
    assert_eq!(second["data"]["days"][2]["date"], "2024-01-06");
    assert_eq!(second["pagination"]["has_more"], false);
    // metrics come back from the cursor
    assert_eq!(second["metadata"]["metrics"], json!(["summary"]));
    assert_eq!(api.calls_to("get_user_summary").len(), 10);
    assert!(api.calls_to("get_sleep_data").is_empty());
}

#[tokio::test]
async fn test_date_wins_over_period() {
    let api = Arc::new(MockFitnessApi::new().respond("get_user_summary", summary()));

    let envelope = run_tool(
        &api,
        "get_daily_health",
        json!({"date": "yesterday", "period": "30d", "metrics": "summary"}),
    )
    .await;

    assert_eq!(envelope["data"]["date"], "2024-01-14");
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_day_limit_bounds() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(&api, "get_daily_health", json!({"period": "7d", "limit": 40})).await;

    assert_eq!(error_kind(&envelope), Some("invalid_argument"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_steps_totals_over_range() {
    let api = Arc::new(MockFitnessApi::new().respond(
        "get_daily_steps",
        json!([
            {"calendarDate": "2024-01-13", "totalSteps": 8000, "stepGoal": 10000},
            {"calendarDate": "2024-01-14", "totalSteps": 12000, "stepGoal": 10000},
            {"calendarDate": "2024-01-15", "totalSteps": 10000, "stepGoal": 10000},
        ]),
    ));

    let envelope = run_tool(&api, "get_daily_steps", json!({"period": "3d", "limit": 2})).await;

    assert_eq!(envelope["data"]["count"], 2);
    assert_eq!(envelope["data"]["days"][0]["date"], "2024-01-15");
    assert_eq!(envelope["data"]["days"][0]["goal_met"], true);
    assert_eq!(envelope["pagination"]["has_more"], true);

    let insights: Vec<&str> = envelope["analysis"]["insights"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i.as_str())
        .collect();
    assert!(insights.contains(&"Total steps: 30,000"));
    assert!(insights.contains(&"Goal achieved on 2/3 days (67%)"));

    assert_eq!(
        api.calls(),
        vec![ApiCall::DailySteps {
            start: date("2024-01-13"),
            end: date("2024-01-15"),
        }]
    );
}

#[tokio::test]
async fn test_steps_failure_is_an_error_envelope() {
    let api = Arc::new(MockFitnessApi::new().api_error("get_daily_steps", 503));

    let envelope = run_tool(&api, "get_daily_steps", json!({})).await;

    assert_eq!(error_kind(&envelope), Some("api_error"));
    assert!(envelope.get("data").is_none());
}

#[tokio::test]
async fn test_extra_metrics_are_opt_in() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond("get_spo2_data", json!({"averageSpO2": 88.0, "lowestSpO2": 84}))
            .respond(
                "get_hydration_data",
                json!({"valueInML": 2600.0, "goalInML": 2500.0}),
            )
            .respond(
                "get_rhr_day",
                json!({"allMetrics": {"metricsMap": {"WELLNESS_RESTING_HEART_RATE": [{"value": 51.0}]}}}),
            ),
    );

    run_tool(&api, "get_daily_health", json!({"date": "2024-01-14"})).await;
    assert!(api.calls_to("get_spo2_data").is_empty());
    assert!(api.calls_to("get_rhr_day").is_empty());

    let envelope = run_tool(
        &api,
        "get_daily_health",
        json!({"date": "2024-01-14", "metrics": "spo2,hydration,resting_heart_rate"}),
    )
    .await;

    assert_eq!(envelope["data"]["spo2"]["average"], 88.0);
    assert_eq!(envelope["data"]["hydration"]["goal_progress_percent"], 104.0);
    assert_eq!(envelope["data"]["resting_heart_rate"]["resting"], 51);
    assert_eq!(
        api.calls_to("get_rhr_day"),
        vec![ApiCall::RestingHeartRate(date("2024-01-14"))]
    );

    let insights: Vec<&str> = envelope["analysis"]["insights"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i.as_str())
        .collect();
    assert!(insights.contains(&"2024-01-14: low blood oxygen (average 88%)"));
    assert!(insights.contains(&"2024-01-14: hydration goal reached"));
}

#[tokio::test]
async fn test_all_metrics_cover_every_daily_endpoint() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(&api, "get_daily_health", json!({"metrics": "all"})).await;

    assert_eq!(envelope["metadata"]["metrics"].as_array().unwrap().len(), 13);
    assert_eq!(api.calls().len(), 13);
    assert_eq!(
        api.calls_to("get_all_day_events"),
        vec![ApiCall::AllDayEvents(date("2024-01-15"))]
    );
    assert!(envelope["data"]["floors"].is_null());
}

#[tokio::test]
async fn test_womens_health_views() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond(
                "get_menstrual_calendar_data",
                json!({"cycleSummaries": [{"startDate": "2023-11-20"}, {"startDate": "2023-12-18"}]}),
            )
            .respond("get_menstrual_data_for_date", json!({"daySummary": {"dayInCycle": 12}})),
    );

    let day = run_tool(&api, "get_womens_health", json!({"date": "yesterday"})).await;
    assert_eq!(day["data"]["day"]["daySummary"]["dayInCycle"], 12);
    assert_eq!(day["metadata"]["view"], "day");
    assert_eq!(
        api.calls_to("get_menstrual_data_for_date"),
        vec![ApiCall::MenstrualDay(date("2024-01-14"))]
    );

    let calendar = run_tool(&api, "get_womens_health", json!({"view": "calendar"})).await;
    assert_eq!(calendar["analysis"]["insights"][0], "2 cycles in Last 90 days");
    assert_eq!(
        api.calls_to("get_menstrual_calendar_data"),
        vec![ApiCall::MenstrualCalendar {
            start: date("2023-10-18"),
            end: date("2024-01-15"),
        }]
    );

    let pregnancy = run_tool(&api, "get_womens_health", json!({"view": "pregnancy"})).await;
    assert!(pregnancy["data"]["pregnancy"].is_null());
    assert_eq!(pregnancy["analysis"]["insights"][0], "No pregnancy is being tracked");
}

#[tokio::test]
async fn test_womens_health_unknown_view_rejected() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(&api, "get_womens_health", json!({"view": "weekly"})).await;

    assert_eq!(error_kind(&envelope), Some("invalid_argument"));
    assert!(api.calls().is_empty());
}
