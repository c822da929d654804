// ABOUTME: Integration tests for badge, challenge, and saved workout tools
// ABOUTME: Checks section selection, per-list fault isolation, and workout lookup by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{error_kind, run_tool, MockFitnessApi};
use garmin_providers::{ApiCall, ChallengeKind};
use serde_json::json;

#[tokio::test]
async fn test_badges_and_every_challenge_list_by_default() {
    let api = Arc::new(
        MockFitnessApi::new()
            .respond(
                "get_earned_badges",
                json!([
                    {"badgeId": 1, "badgeName": "First Run", "badgePoints": 1},
                    {"badgeId": 40, "badgeName": "Marathoner", "badgePoints": 8},
                ]),
            )
            .respond(
                "get_inprogress_virtual_challenges",
                json!([{"uuid": "v-1", "challengeName": "Route 66", "userProgress": 41.5}]),
            )
            .api_error("get_adhoc_challenges", 500),
    );

    let envelope = run_tool(&api, "get_badges_and_challenges", json!({"limit": 5})).await;

    assert!(error_kind(&envelope).is_none());
    assert_eq!(envelope["data"]["earned_badges"][1]["name"], "Marathoner");
    assert!(envelope["data"]["adhoc_challenges"].is_null());
    assert_eq!(
        envelope["data"]["in_progress_virtual_challenges"][0]["progress"],
        41.5
    );
    assert_eq!(envelope["analysis"]["insights"][0], "2 badges earned, 9 points");
    assert_eq!(
        envelope["analysis"]["insights"][1],
        "1 virtual challenges in progress"
    );
    assert_eq!(api.calls().len(), 6);
    assert_eq!(
        api.calls_to("get_non_completed_badge_challenges"),
        vec![ApiCall::Challenges {
            kind: ChallengeKind::NonCompletedBadge,
            start: 1,
            limit: 5,
        }]
    );
}

#[tokio::test]
async fn test_badge_sections_subset() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(
        &api,
        "get_badges_and_challenges",
        json!({"sections": "badge_challenges,earned_badges"}),
    )
    .await;

    assert_eq!(
        envelope["metadata"]["sections"],
        json!(["earned_badges", "badge_challenges"])
    );
    assert_eq!(api.calls().len(), 2);
    assert!(envelope["data"].get("adhoc_challenges").is_none());
}

#[tokio::test]
async fn test_unknown_badge_section_rejected() {
    let api = Arc::new(MockFitnessApi::new());

    let envelope = run_tool(
        &api,
        "get_badges_and_challenges",
        json!({"sections": "trophies"}),
    )
    .await;

    assert_eq!(error_kind(&envelope), Some("invalid_argument"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_workout_by_id_flattens_repeat_steps() {
    let api = Arc::new(MockFitnessApi::new().respond(
        "get_workout_by_id",
        json!({
            "workoutId": 321,
            "workoutName": "Track 6x400",
            "sportType": {"sportTypeKey": "running"},
            "workoutSegments": [{
                "workoutSteps": [
                    {"stepOrder": 1, "stepType": {"stepTypeKey": "warmup"}},
                    {"stepOrder": 2, "workoutSteps": [
                        {"stepOrder": 3, "stepType": {"stepTypeKey": "interval"}},
                        {"stepOrder": 4, "stepType": {"stepTypeKey": "recovery"}},
                    ]},
                    {"stepOrder": 5, "stepType": {"stepTypeKey": "cooldown"}},
                ]
            }]
        }),
    ));

    let envelope = run_tool(&api, "get_workouts", json!({"workout_id": 321, "limit": 3})).await;

    assert_eq!(envelope["data"]["workout"]["name"], "Track 6x400");
    assert_eq!(envelope["data"]["step_count"], 4);
    assert_eq!(envelope["data"]["steps"][1]["type"], "interval");
    assert_eq!(envelope["metadata"]["query_type"], "by_id");
    assert!(envelope.get("pagination").is_none());
    assert_eq!(api.calls(), vec![ApiCall::Workout(321)]);
}

#[tokio::test]
async fn test_missing_workout_is_not_found() {
    let api = Arc::new(MockFitnessApi::new().not_found("get_workout_by_id"));

    let envelope = run_tool(&api, "get_workouts", json!({"workout_id": 9})).await;

    assert_eq!(error_kind(&envelope), Some("not_found"));
}

#[tokio::test]
async fn test_workout_listing_pages() {
    let workouts: Vec<_> = (0..4)
        .map(|i| json!({"workoutId": 100 + i, "workoutName": format!("Workout {i}")}))
        .collect();
    let api = Arc::new(MockFitnessApi::new().respond_with("get_workouts", move |call| {
        let ApiCall::Workouts { start, limit } = call else {
            return Ok(json!(null));
        };
        let start = (*start as usize).min(workouts.len());
        let end = (start + *limit as usize).min(workouts.len());
        Ok(json!(workouts[start..end]))
    }));

    let envelope = run_tool(&api, "get_workouts", json!({"limit": 3})).await;

    assert_eq!(envelope["data"]["count"], 3);
    assert_eq!(envelope["pagination"]["has_more"], true);
    assert_eq!(envelope["metadata"]["query_type"], "list");
    assert_eq!(api.calls(), vec![ApiCall::Workouts { start: 0, limit: 4 }]);
}
