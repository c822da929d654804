// ABOUTME: Integration tests for device and gear tools
// ABOUTME: Covers optional device sections keyed by device_id and gear stats and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{date, error_kind, run_tool, MockFitnessApi};
use garmin_providers::ApiCall;
use serde_json::json;

fn devices() -> serde_json::Value {
    json!([
        {"deviceId": 3_300_001, "productDisplayName": "Forerunner 965", "currentFirmwareVersion": "19.18"},
        {"deviceId": 3_300_002, "productDisplayName": "Index S2"},
    ])
}

#[tokio::test]
async fn test_devices_include_last_used_and_primary_by_default() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond("get_devices", devices())
            .respond("get_primary_training_device", json!({"deviceId": 3_300_001}))
            .api_error("get_device_last_used", 503),
    );

    let envelope = run_tool(&api, "get_devices", json!({})).await;

    assert_eq!(envelope["data"]["count"], 2);
    assert_eq!(envelope["data"]["devices"][0]["name"], "Forerunner 965");
    assert!(envelope["data"]["last_used"].is_null());
    assert_eq!(envelope["data"]["primary_device"]["deviceId"], 3_300_001);
    assert_eq!(envelope["analysis"]["insights"][0], "2 registered devices");
    assert_eq!(
        envelope["analysis"]["insights"][1],
        "Primary training device identified"
    );
    assert!(api.calls_to("get_device_settings").is_empty());
}

#[tokio::test]
async fn test_device_sections_share_one_settings_call() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond("get_devices", devices())
            .respond(
                "get_device_settings",
                json!({"alarms": [{"alarmId": 7, "alarmTime": 390, "alarmMode": "ON", "alarmDays": ["MONDAY"]}]}),
            )
            .respond(
                "get_device_solar_data",
                json!({"deviceSolarInput": [{"solarDailyDataDTOs": [
                    {"calendarDate": "2024-01-14", "solarInputReadings": [{"solarUtilization": 12.0}, {"solarUtilization": 30.0}]}
                ]}]}),
            ),
    );

    let envelope = run_tool(
        &api,
        "get_devices",
        json!({
            "device_id": 3_300_001,
            "include_last_used": false,
            "include_primary": false,
            "include_settings": true,
            "include_alarms": true,
            "include_solar": true,
            "date": "yesterday",
        }),
    )
    .await;

    assert_eq!(envelope["data"]["alarms"][0]["minutes_after_midnight"], 390);
    assert!(envelope["data"]["settings"]["alarms"].is_array());
    assert_eq!(envelope["data"]["solar"]["days"][0]["readings"], 2);
    assert_eq!(envelope["metadata"]["device_id"], 3_300_001);
    assert_eq!(api.calls_to("get_device_settings"), vec![ApiCall::DeviceSettings(3_300_001)]);
    assert_eq!(
        api.calls_to("get_device_solar_data"),
        vec![ApiCall::DeviceSolar {
            device_id: 3_300_001,
            start: date("2024-01-14"),
            end: date("2024-01-14"),
        }]
    );
    assert!(api.calls_to("get_device_last_used").is_empty());
}

#[tokio::test]
async fn test_device_sections_need_device_id() {
    let api = Arc::new(MockFitnessApi::new().respond("get_devices", devices()));

    let envelope = run_tool(&api, "get_devices", json!({"include_settings": true})).await;

    assert!(envelope["data"].get("settings").is_none());
    assert!(api.calls_to("get_device_settings").is_empty());
}

#[tokio::test]
async fn test_gear_stats_and_defaults() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond(
                "get_gear",
                json!([
                    {"uuid": "shoe-1", "displayName": "Daily trainer", "gearStatusName": "active"},
                    {"uuid": "bike-1", "displayName": "Road bike", "gearStatusName": "retired"},
                ]),
            )
            .respond("get_gear_stats", json!({"totalActivities": 80, "totalDistance": 612_000.0}))
            .respond(
                "get_gear_defaults",
                json!([
                    {"uuid": "shoe-1", "activityTypePk": 1, "defaultGear": true},
                    {"uuid": "bike-1", "activityTypePk": 2, "defaultGear": false},
                ]),
            ),
    );

    let envelope = run_tool(
        &api,
        "get_gear",
        json!({"include_stats": true, "include_defaults": true}),
    )
    .await;

    assert_eq!(envelope["data"]["count"], 2);
    assert_eq!(envelope["data"]["gear"][0]["stats"]["total_activities"], 80);
    assert_eq!(envelope["data"]["defaults"].as_array().unwrap().len(), 1);
    assert_eq!(envelope["data"]["defaults"][0]["gear_uuid"], "shoe-1");
    assert_eq!(envelope["analysis"]["insights"][0], "2 gear items, 1 active");
    assert_eq!(api.calls_to("get_gear_stats").len(), 2);
    assert_eq!(api.calls_to("get_gear_defaults"), vec![ApiCall::GearDefaults]);
}

#[tokio::test]
async fn test_gear_failure_is_an_error_envelope() {
    let api = Arc::new(MockFitnessApi::new().unauthorized("get_gear"));

    let envelope = run_tool(&api, "get_gear", json!({"include_defaults": true})).await;

    assert_eq!(error_kind(&envelope), Some("authentication_error"));
    assert!(api.calls_to("get_gear_defaults").is_empty());
}
