// ABOUTME: Integration tests for the body measurement tools
// ABOUTME: Covers weigh-in, blood pressure, and body composition paging and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{date, error_kind, run_tool, MockFitnessApi};
use garmin_providers::ApiCall;
use serde_json::{json, Value};

fn reading(timestamp: &str, systolic: i64, diastolic: i64) -> Value {
    json!({
        "measurementTimestampLocal": timestamp,
        "systolic": systolic,
        "diastolic": diastolic,
        "pulse": 58,
    })
}

#[tokio::test]
async fn test_blood_pressure_pages_newest_first() {
    let api = Arc::new(MockFitnessApi::new().respond(
        "get_blood_pressure",
        json!({"measurementSummaries": [
            {"measurements": [reading("2024-01-02T07:30:00.0", 121, 79)]},
            {"measurements": [reading("2024-01-09T07:30:00.0", 127, 83)]},
            {"measurements": [reading("2024-01-14T07:30:00.0", 119, 77)]},
        ]}),
    ));

    let first = run_tool(&api, "query_blood_pressure", json!({"limit": 2})).await;

    assert_eq!(first["data"]["count"], 2);
    assert_eq!(first["data"]["readings"][0]["systolic"], 119);
    assert_eq!(first["data"]["readings"][1]["timestamp"], "2024-01-09T07:30:00.0");
    assert_eq!(first["pagination"]["has_more"], true);
    assert_eq!(first["analysis"]["insights"][0], "3 readings, average 122/80 mmHg");
    assert_eq!(
        api.calls(),
        vec![ApiCall::BloodPressure {
            start: date("2023-12-17"),
            end: date("2024-01-15"),
        }]
    );

    let cursor = first["pagination"]["cursor"].as_str().unwrap().to_owned();
    let second = run_tool(&api, "query_blood_pressure", json!({"cursor": cursor})).await;

    assert_eq!(second["data"]["count"], 1);
    assert_eq!(second["data"]["readings"][0]["systolic"], 121);
    assert_eq!(second["metadata"]["start_date"], "2023-12-17");
}

#[tokio::test]
async fn test_blood_pressure_failure_is_an_error_envelope() {
    let api = Arc::new(MockFitnessApi::new().api_error("get_blood_pressure", 500));

    let envelope = run_tool(&api, "query_blood_pressure", json!({"period": "7d"})).await;

    assert_eq!(error_kind(&envelope), Some("api_error"));
}

#[tokio::test]
async fn test_body_composition_formats_masses() {
    let api = Arc::new(MockFitnessApi::new().respond(
        "get_body_composition",
        json!({
            "dateWeightList": [
                {"calendarDate": "2024-01-10", "weight": 72_000.0, "bodyFat": 18.5, "muscleMass": 33_000.0},
                {"calendarDate": "2024-01-14", "weight": 71_500.0, "bodyFat": 18.1, "boneMass": 3100.0},
            ],
            "totalAverage": {"weight": 71_750.0, "bodyFat": 18.3},
        }),
    ));

    let envelope = run_tool(
        &api,
        "get_body_composition",
        json!({"period": "7d", "unit": "imperial"}),
    )
    .await;

    assert_eq!(envelope["data"]["count"], 2);
    let newest = &envelope["data"]["entries"][0];
    assert_eq!(newest["date"], "2024-01-14");
    assert_eq!(newest["weight"]["grams"], 71_500.0);
    assert_eq!(newest["weight"]["formatted"], "157.63 lbs");
    assert_eq!(newest["bone_mass"]["grams"], 3100.0);
    assert_eq!(envelope["data"]["averages"]["body_fat_percent"], 18.3);
    assert!(envelope["data"]["averages"].get("date").is_none());
    assert_eq!(envelope["metadata"]["unit"], "imperial");
    assert_eq!(
        api.calls(),
        vec![ApiCall::BodyComposition {
            start: date("2024-01-09"),
            end: date("2024-01-15"),
        }]
    );
}

#[tokio::test]
async fn test_body_composition_empty_range() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(&api, "get_body_composition", json!({})).await;

    assert_eq!(envelope["data"]["count"], 0);
    assert!(envelope["data"]["averages"].is_null());
    assert_eq!(
        envelope["analysis"]["insights"][0],
        "No body composition entries in this period"
    );
}
