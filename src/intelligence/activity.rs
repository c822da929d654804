// ABOUTME: Typed view over raw Garmin activity JSON used by every analysis routine
// ABOUTME: Extracts id, type, distance, duration, elevation, heart rate, and training effect fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Type key used when Garmin omits `activityType`
pub const UNKNOWN_ACTIVITY_TYPE: &str = "unknown";

/// The numeric fields analysis needs from one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Garmin activity id
    pub id: Option<u64>,
    /// Activity name as entered by the user
    pub name: Option<String>,
    /// `activityType.typeKey`, e.g. `running`
    pub type_key: String,
    /// Local start date
    pub start_date: Option<NaiveDate>,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    /// Meters climbed
    pub elevation_gain: f64,
    /// Average heart rate in bpm
    pub average_hr: Option<f64>,
}

impl ActivitySummary {
    /// Extract a summary from an activity object; missing numbers become zero
    #[must_use]
    pub fn from_json(raw: &Value) -> Self {
        Self {
            id: raw.get("activityId").and_then(Value::as_u64),
            name: raw
                .get("activityName")
                .and_then(Value::as_str)
                .map(str::to_owned),
            type_key: activity_type_key(raw).to_owned(),
            start_date: raw
                .get("startTimeLocal")
                .and_then(Value::as_str)
                .and_then(|text| text.get(..10))
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()),
            distance: number(raw, "distance").unwrap_or(0.0),
            duration: number(raw, "duration").unwrap_or(0.0),
            elevation_gain: number(raw, "elevationGain").unwrap_or(0.0),
            average_hr: number(raw, "averageHR").filter(|hr| *hr > 0.0),
        }
    }

    /// Average speed in m/s when both distance and duration are positive
    #[must_use]
    pub fn speed_mps(&self) -> Option<f64> {
        (self.distance > 0.0 && self.duration > 0.0).then(|| self.distance / self.duration)
    }
}

/// `activityType.typeKey`, or [`UNKNOWN_ACTIVITY_TYPE`]
#[must_use]
pub fn activity_type_key(raw: &Value) -> &str {
    raw.get("activityType")
        .and_then(|kind| kind.get("typeKey"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ACTIVITY_TYPE)
}

/// Numeric field of a JSON object, ignoring non-numbers
#[must_use]
pub fn number(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(Value::as_f64)
}

/// Training effect block pulled out of an activity summary
///
/// Garmin reports these on the summary DTO for newer activities and at the
/// top level of older ones, so both places are checked.
#[must_use]
pub fn training_effect(activity: &Value) -> Value {
    const FIELDS: [(&str, &str); 5] = [
        ("aerobicTrainingEffect", "aerobic"),
        ("anaerobicTrainingEffect", "anaerobic"),
        ("trainingEffectLabel", "label"),
        ("aerobicTrainingEffectMessage", "aerobic_message"),
        ("anaerobicTrainingEffectMessage", "anaerobic_message"),
    ];

    let summary = activity.get("summaryDTO");
    let mut effect = Map::new();
    for (source, target) in FIELDS {
        let value = summary
            .and_then(|dto| dto.get(source))
            .or_else(|| activity.get(source))
            .filter(|value| !value.is_null());
        if let Some(value) = value {
            effect.insert(target.to_owned(), value.clone());
        }
    }
    if let Some(load) = summary
        .and_then(|dto| dto.get("activityTrainingLoad"))
        .or_else(|| activity.get("activityTrainingLoad"))
        .filter(|value| !value.is_null())
    {
        effect.insert("training_load".to_owned(), load.clone());
    }

    if effect.is_empty() {
        Value::Null
    } else {
        json!(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_search_result() {
        let raw = json!({
            "activityId": 12_345,
            "activityName": "Morning Run",
            "activityType": {"typeKey": "running"},
            "startTimeLocal": "2024-01-15 07:30:00",
            "distance": 5000.0,
            "duration": 1500.0,
            "averageHR": 150.0
        });
        let summary = ActivitySummary::from_json(&raw);
        assert_eq!(summary.id, Some(12_345));
        assert_eq!(summary.type_key, "running");
        assert_eq!(summary.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!((summary.elevation_gain).abs() < f64::EPSILON);
        assert_eq!(summary.speed_mps(), Some(5000.0 / 1500.0));
    }

    #[test]
    fn test_training_effect_prefers_summary_dto() {
        let raw = json!({
            "aerobicTrainingEffect": 1.0,
            "summaryDTO": {"aerobicTrainingEffect": 3.4, "anaerobicTrainingEffect": 1.2}
        });
        let effect = training_effect(&raw);
        assert_eq!(effect["aerobic"], json!(3.4));
        assert_eq!(effect["anaerobic"], json!(1.2));
        assert!(training_effect(&json!({})).is_null());
    }
}
