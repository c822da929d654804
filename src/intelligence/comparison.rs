// ABOUTME: Side-by-side comparison of two to five activities
// ABOUTME: Finds extremes for distance, time, pace, elevation, and heart rate and describes pace spread
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;

use garmin_core::units::{
    format_distance, format_duration, format_elevation, format_pace, UnitSystem,
};
use serde_json::{json, Map, Value};

use super::activity::ActivitySummary;

/// Pace spread above which variation is "large", in percent
const LARGE_PACE_VARIATION: f64 = 25.0;
/// Pace spread above which variation is "moderate", in percent
const MODERATE_PACE_VARIATION: f64 = 10.0;
/// Distance spread below which distances count as similar, in percent
const SIMILAR_DISTANCE_SPREAD: f64 = 10.0;

/// Comparison block and insights for a set of activities
#[derive(Debug, Clone)]
pub struct ActivityComparison {
    /// `comparison` object of the envelope
    pub comparison: Value,
    /// Human-readable findings
    pub insights: Vec<String>,
}

/// Highest and lowest entry of a metric, as `(id, value)`
fn extremes(values: &[(Option<u64>, f64)]) -> Option<((Option<u64>, f64), (Option<u64>, f64))> {
    let max = values
        .iter()
        .copied()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    let min = values
        .iter()
        .copied()
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    Some((max, min))
}

fn collect(
    activities: &[ActivitySummary],
    metric: impl Fn(&ActivitySummary) -> Option<f64>,
) -> Vec<(Option<u64>, f64)> {
    activities
        .iter()
        .filter_map(|a| metric(a).map(|value| (a.id, value)))
        .collect()
}

fn spread_percent(high: f64, low: f64) -> Option<f64> {
    (low > 0.0).then(|| (high - low) / low * 100.0)
}

/// Compare activities metric by metric
///
/// Metrics missing on every activity are left out of the comparison.
#[must_use]
pub fn compare_activities(activities: &[ActivitySummary], unit: UnitSystem) -> ActivityComparison {
    let mut comparison = Map::new();

    let distances = collect(activities, |a| (a.distance > 0.0).then_some(a.distance));
    if let Some(((long_id, long), (short_id, short))) = extremes(&distances) {
        comparison.insert(
            "distance".to_owned(),
            json!({
                "longest": {"id": long_id, "meters": long, "formatted": format_distance(Some(long), unit)},
                "shortest": {"id": short_id, "meters": short, "formatted": format_distance(Some(short), unit)},
            }),
        );
    }

    let times = collect(activities, |a| (a.duration > 0.0).then_some(a.duration));
    if let Some(((slow_id, slow), (fast_id, fast))) = extremes(&times) {
        comparison.insert(
            "time".to_owned(),
            json!({
                "fastest": {"id": fast_id, "seconds": fast, "formatted": format_duration(Some(fast))},
                "slowest": {"id": slow_id, "seconds": slow, "formatted": format_duration(Some(slow))},
            }),
        );
    }

    let paces = collect(activities, ActivitySummary::speed_mps);
    if let Some(((fast_id, fast), (slow_id, slow))) = extremes(&paces) {
        comparison.insert(
            "pace".to_owned(),
            json!({
                "fastest": {"id": fast_id, "mps": fast, "formatted": format_pace(Some(fast), unit)},
                "slowest": {"id": slow_id, "mps": slow, "formatted": format_pace(Some(slow), unit)},
            }),
        );
    }

    let elevations = collect(activities, |a| {
        (a.elevation_gain > 0.0).then_some(a.elevation_gain)
    });
    if let Some(((most_id, most), (least_id, least))) = extremes(&elevations) {
        comparison.insert(
            "elevation".to_owned(),
            json!({
                "most": {"id": most_id, "meters": most, "formatted": format_elevation(Some(most), unit)},
                "least": {"id": least_id, "meters": least, "formatted": format_elevation(Some(least), unit)},
            }),
        );
    }

    let heart_rates = collect(activities, |a| a.average_hr);
    if let Some(((high_id, high), (low_id, low))) = extremes(&heart_rates) {
        comparison.insert(
            "heart_rate".to_owned(),
            json!({
                "highest_avg": {"id": high_id, "bpm": high, "formatted": format!("{high:.0} bpm")},
                "lowest_avg": {"id": low_id, "bpm": low, "formatted": format!("{low:.0} bpm")},
            }),
        );
    }

    let mut insights = Vec::new();
    let types: BTreeSet<&str> = activities.iter().map(|a| a.type_key.as_str()).collect();
    if types.len() == 1 {
        if let Some(only) = types.first() {
            insights.push(format!("All activities are {only} type"));
        }
    } else {
        insights.push(format!(
            "Activities span {} different types: {}",
            types.len(),
            types.iter().copied().collect::<Vec<_>>().join(", ")
        ));
    }

    if paces.len() >= 2 {
        if let Some(spread) = extremes(&paces).and_then(|((_, fast), (_, slow))| spread_percent(fast, slow)) {
            if spread > LARGE_PACE_VARIATION {
                insights.push(format!(
                    "Large pace variation: fastest is {spread:.0}% faster than slowest"
                ));
            } else if spread > MODERATE_PACE_VARIATION {
                insights.push(format!(
                    "Moderate pace variation: fastest is {spread:.0}% faster than slowest"
                ));
            } else {
                insights.push(format!(
                    "Consistent pace: only {spread:.0}% difference between fastest and slowest"
                ));
            }
        }
    }

    if distances.len() >= 2
        && extremes(&distances)
            .and_then(|((_, long), (_, short))| spread_percent(long, short))
            .is_some_and(|spread| spread < SIMILAR_DISTANCE_SPREAD)
    {
        insights.push("Similar distance across all activities".to_owned());
    }

    ActivityComparison {
        comparison: Value::Object(comparison),
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: u64, type_key: &str, distance: f64, duration: f64) -> ActivitySummary {
        ActivitySummary {
            id: Some(id),
            name: None,
            type_key: type_key.to_owned(),
            start_date: None,
            distance,
            duration,
            elevation_gain: 0.0,
            average_hr: None,
        }
    }

    #[test]
    fn test_pace_extremes_and_variation() {
        let runs = [
            activity(1, "running", 5000.0, 1500.0),
            activity(2, "running", 5000.0, 2000.0),
        ];
        let result = compare_activities(&runs, UnitSystem::Metric);

        assert_eq!(result.comparison["pace"]["fastest"]["id"], 1);
        assert_eq!(result.comparison["pace"]["slowest"]["id"], 2);
        assert_eq!(result.comparison["time"]["fastest"]["id"], 1);
        assert!(result.comparison.get("elevation").is_none());
        assert_eq!(result.insights[0], "All activities are running type");
        assert!(result.insights[1].starts_with("Large pace variation: fastest is 33%"));
        assert_eq!(result.insights[2], "Similar distance across all activities");
    }

    #[test]
    fn test_mixed_types_are_listed() {
        let mixed = [
            activity(1, "running", 5000.0, 1500.0),
            activity(2, "cycling", 20_000.0, 3600.0),
        ];
        let result = compare_activities(&mixed, UnitSystem::Metric);
        assert_eq!(
            result.insights[0],
            "Activities span 2 different types: cycling, running"
        );
    }
}
