// ABOUTME: Aggregates the activities of a period into totals, per-type breakdown, and weekly buckets
// ABOUTME: Produces the volume, trend, and focus insights reported by analyze_training_period
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::cast_precision_loss)] // Safe: activity counts are far below 2^52

use std::collections::HashMap;

use chrono::NaiveDate;
use garmin_core::time_range::{week_ranges, TimeRange};
use garmin_core::units::{
    format_date_with_day, format_distance, format_duration, format_elevation, UnitSystem,
};
use serde_json::{json, Value};

use super::activity::ActivitySummary;

/// Activities at or above this count are "high" volume
const HIGH_VOLUME_ACTIVITIES: usize = 15;
/// Activities at or above this count are "moderate" volume
const MODERATE_VOLUME_ACTIVITIES: usize = 8;
/// Second-half/first-half ratio above which volume is rising
const INCREASING_RATIO: f64 = 1.2;
/// Second-half/first-half ratio below which volume is falling
const DECREASING_RATIO: f64 = 0.8;
/// Share of the dominant type above which training is "heavily focused"
const HEAVY_FOCUS_PERCENT: f64 = 70.0;
/// Share of the dominant type above which training is "primarily focused"
const PRIMARY_FOCUS_PERCENT: f64 = 50.0;

/// Totals for one activity type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBreakdown {
    /// `activityType.typeKey`
    pub type_key: String,
    /// Number of activities
    pub count: usize,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

/// Totals for one Monday-to-Sunday bucket
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    /// First day, clamped to the period
    pub start: NaiveDate,
    /// Last day, clamped to the period
    pub end: NaiveDate,
    /// Activities started in the bucket
    pub activities: usize,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

/// Aggregated view of a training period
#[derive(Debug, Clone)]
pub struct TrainingPeriodAnalysis {
    /// The analyzed period
    pub range: TimeRange,
    /// Number of activities
    pub total_activities: usize,
    /// Meters
    pub total_distance: f64,
    /// Seconds
    pub total_duration: f64,
    /// Meters climbed
    pub total_elevation: f64,
    /// Per-type totals, most frequent first
    pub by_type: Vec<TypeBreakdown>,
    /// Weekly buckets in date order
    pub weeks: Vec<WeekBucket>,
}

impl TrainingPeriodAnalysis {
    /// Aggregate `activities` over `range`
    #[must_use]
    pub fn analyze(range: TimeRange, activities: &[ActivitySummary]) -> Self {
        let mut by_type: HashMap<&str, TypeBreakdown> = HashMap::new();
        for activity in activities {
            let entry = by_type
                .entry(activity.type_key.as_str())
                .or_insert_with(|| TypeBreakdown {
                    type_key: activity.type_key.clone(),
                    count: 0,
                    distance: 0.0,
                    duration: 0.0,
                });
            entry.count += 1;
            entry.distance += activity.distance;
            entry.duration += activity.duration;
        }
        let mut by_type: Vec<TypeBreakdown> = by_type.into_values().collect();
        by_type.sort_by(|a, b| b.count.cmp(&a.count).then(a.type_key.cmp(&b.type_key)));

        let weeks = week_ranges(&range)
            .into_iter()
            .map(|(start, end)| {
                let in_week: Vec<&ActivitySummary> = activities
                    .iter()
                    .filter(|a| a.start_date.is_some_and(|d| d >= start && d <= end))
                    .collect();
                WeekBucket {
                    start,
                    end,
                    activities: in_week.len(),
                    distance: in_week.iter().map(|a| a.distance).sum(),
                    duration: in_week.iter().map(|a| a.duration).sum(),
                }
            })
            .collect();

        Self {
            range,
            total_activities: activities.len(),
            total_distance: activities.iter().map(|a| a.distance).sum(),
            total_duration: activities.iter().map(|a| a.duration).sum(),
            total_elevation: activities.iter().map(|a| a.elevation_gain).sum(),
            by_type,
            weeks,
        }
    }

    /// Share of all activities taken by one type, in percent with one decimal
    #[must_use]
    pub fn percentage(&self, breakdown: &TypeBreakdown) -> f64 {
        if self.total_activities == 0 {
            return 0.0;
        }
        round1(breakdown.count as f64 / self.total_activities as f64 * 100.0)
    }

    /// Volume, trend, and focus insights
    #[must_use]
    pub fn insights(&self) -> Vec<String> {
        if self.total_activities == 0 {
            return vec!["No activities found in this period".to_owned()];
        }

        let days = self.range.days();
        let count = self.total_activities;
        let volume = if count >= HIGH_VOLUME_ACTIVITIES {
            "High"
        } else if count >= MODERATE_VOLUME_ACTIVITIES {
            "Moderate"
        } else {
            "Light"
        };
        let mut insights = vec![format!(
            "{volume} training volume: {count} activities in {days} days"
        )];

        if self.weeks.len() >= 2 {
            let (first, second) = self.weeks.split_at(self.weeks.len() / 2);
            let first_count = first.iter().map(|w| w.activities).sum::<usize>() as f64;
            let second_count = second.iter().map(|w| w.activities).sum::<usize>() as f64;
            if second_count > first_count * INCREASING_RATIO {
                insights.push("Training volume increasing over time".to_owned());
            } else if second_count < first_count * DECREASING_RATIO {
                insights.push("Training volume decreasing over time".to_owned());
            } else {
                insights.push("Training volume relatively consistent".to_owned());
            }
        }

        if let Some(dominant) = self.by_type.first() {
            let share = self.percentage(dominant);
            if share > HEAVY_FOCUS_PERCENT {
                insights.push(format!("Training heavily focused on {}", dominant.type_key));
            } else if share > PRIMARY_FOCUS_PERCENT {
                insights.push(format!(
                    "Training primarily focused on {}",
                    dominant.type_key
                ));
            } else {
                insights.push("Varied training across multiple activity types".to_owned());
            }
        }

        insights
    }

    /// Envelope `data` payload
    #[must_use]
    pub fn to_json(&self, unit: UnitSystem) -> Value {
        let days = self.range.days();
        let period = json!({
            "description": self.range.description,
            "start_date": self.range.start_str(),
            "end_date": self.range.end_str(),
            "days": days,
        });
        if self.total_activities == 0 {
            return json!({"period": period, "summary": {"total_activities": 0}});
        }

        let count = self.total_activities as f64;
        let per_activity = self.total_distance / count;
        let per_week = if days > 0 {
            round1(count / (days as f64 / 7.0))
        } else {
            0.0
        };

        let by_type: Vec<Value> = self
            .by_type
            .iter()
            .map(|t| {
                json!({
                    "type": t.type_key,
                    "count": t.count,
                    "percentage": self.percentage(t),
                    "distance": distance_json(t.distance, unit),
                    "time": duration_json(t.duration),
                })
            })
            .collect();

        let weekly: Vec<Value> = self
            .weeks
            .iter()
            .map(|w| {
                json!({
                    "week_start": format_date_with_day(&w.start.to_string()),
                    "week_end": format_date_with_day(&w.end.to_string()),
                    "activities": w.activities,
                    "distance": distance_json(w.distance, unit),
                    "time": duration_json(w.duration),
                })
            })
            .collect();

        json!({
            "period": period,
            "summary": {
                "total_activities": self.total_activities,
                "total_distance": distance_json(self.total_distance, unit),
                "total_time": duration_json(self.total_duration),
                "total_elevation": {
                    "meters": self.total_elevation,
                    "formatted": format_elevation(Some(self.total_elevation), unit),
                },
                "averages": {
                    "distance_per_activity": distance_json(per_activity, unit),
                    "activities_per_week": per_week,
                },
            },
            "by_activity_type": by_type,
            "trends": {"weekly": weekly},
        })
    }
}

fn distance_json(meters: f64, unit: UnitSystem) -> Value {
    json!({"meters": meters, "formatted": format_distance(Some(meters), unit)})
}

fn duration_json(seconds: f64) -> Value {
    json!({"seconds": seconds, "formatted": format_duration(Some(seconds))})
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
