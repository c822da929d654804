// ABOUTME: Unit system selection and human-readable formatting of fitness measurements
// ABOUTME: Converts meters, seconds, m/s, and grams into metric or imperial display strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Measurement formatting.
//!
//! Raw Garmin values are always kept next to their formatted rendering so the
//! model can both quote and compute. Missing values render as `N/A`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::units::{
    FEET_PER_METER, GRAMS_PER_KILOGRAM, GRAMS_PER_POUND, METERS_PER_KILOMETER, METERS_PER_MILE,
    MPS_TO_KMH, MPS_TO_MPH,
};
use crate::errors::AppError;

const NOT_AVAILABLE: &str = "N/A";

/// Measurement system used for display strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kilometers, meters, kilograms
    #[default]
    Metric,
    /// Miles, feet, pounds
    Imperial,
}

impl UnitSystem {
    /// Lowercase identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(AppError::invalid_argument(format!(
                "Invalid unit system '{other}': expected 'metric' or 'imperial'"
            ))),
        }
    }
}

/// Format a distance given in meters
#[must_use]
pub fn format_distance(meters: Option<f64>, unit: UnitSystem) -> String {
    let Some(meters) = meters else {
        return NOT_AVAILABLE.to_owned();
    };
    match unit {
        UnitSystem::Metric => format!("{:.2} km", meters / METERS_PER_KILOMETER),
        UnitSystem::Imperial => format!("{:.2} mi", meters / METERS_PER_MILE),
    }
}

/// Format a duration given in seconds as `1h 2m 3s`, `2m 5s`, or `45s`
#[must_use]
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return NOT_AVAILABLE.to_owned();
    };
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Format an elevation given in meters
#[must_use]
pub fn format_elevation(meters: Option<f64>, unit: UnitSystem) -> String {
    let Some(meters) = meters else {
        return NOT_AVAILABLE.to_owned();
    };
    match unit {
        UnitSystem::Metric => format!("{meters:.0} m"),
        UnitSystem::Imperial => format!("{:.0} ft", meters * FEET_PER_METER),
    }
}

/// Format a speed given in meters per second
#[must_use]
pub fn format_speed(mps: Option<f64>, unit: UnitSystem) -> String {
    match mps {
        Some(mps) if mps > 0.0 => match unit {
            UnitSystem::Metric => format!("{:.2} km/h", mps * MPS_TO_KMH),
            UnitSystem::Imperial => format!("{:.2} mph", mps * MPS_TO_MPH),
        },
        _ => NOT_AVAILABLE.to_owned(),
    }
}

/// Format a pace (`m:ss /km` or `m:ss /mi`) from a speed in meters per second
#[must_use]
pub fn format_pace(mps: Option<f64>, unit: UnitSystem) -> String {
    let Some(mps) = mps.filter(|mps| *mps > 0.0) else {
        return NOT_AVAILABLE.to_owned();
    };
    let (unit_meters, suffix) = match unit {
        UnitSystem::Metric => (METERS_PER_KILOMETER, "/km"),
        UnitSystem::Imperial => (METERS_PER_MILE, "/mi"),
    };
    let seconds_per_unit = (unit_meters / mps) as u64;
    format!(
        "{}:{:02} {suffix}",
        seconds_per_unit / 60,
        seconds_per_unit % 60
    )
}

/// Format a body weight given in grams
#[must_use]
pub fn format_weight(grams: Option<f64>, unit: UnitSystem) -> String {
    let Some(grams) = grams else {
        return NOT_AVAILABLE.to_owned();
    };
    match unit {
        UnitSystem::Metric => format!("{:.2} kg", grams / GRAMS_PER_KILOGRAM),
        UnitSystem::Imperial => format!("{:.2} lbs", grams / GRAMS_PER_POUND),
    }
}

/// Format an integer with thousands separators (`10543` -> `10,543`)
#[must_use]
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A timestamp rendered with its weekday so models never have to compute it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWithDay {
    /// The original timestamp text
    pub datetime: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Weekday name, e.g. `Monday`
    pub day_of_week: String,
    /// e.g. `Monday, January 15, 2024 at 07:30 AM`
    pub formatted: String,
}

/// Parse a Garmin timestamp (`2024-01-15 07:30:00`, `2024-01-15T07:30:00.0`,
/// or a bare date)
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim().trim_end_matches('Z');
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Render a timestamp with its weekday; `None` when the text is not a timestamp
#[must_use]
pub fn format_date_with_day(text: &str) -> Option<DateWithDay> {
    let parsed = parse_timestamp(text)?;
    Some(DateWithDay {
        datetime: text.to_owned(),
        date: parsed.format("%Y-%m-%d").to_string(),
        day_of_week: parsed.format("%A").to_string(),
        formatted: parsed.format("%A, %B %d, %Y at %I:%M %p").to_string(),
    })
}

fn number(raw: &Map<String, Value>, key: &str) -> Option<f64> {
    raw.get(key).and_then(Value::as_f64)
}

/// Reshape a raw Garmin activity into raw plus human-readable fields.
///
/// Distance, duration, elevation, and speed become objects holding both the
/// raw number and its display string; timestamps gain their weekday. Other
/// keys pass through untouched.
#[must_use]
pub fn format_activity(raw: &Value, unit: UnitSystem) -> Value {
    let Some(source) = raw.as_object() else {
        return raw.clone();
    };
    let mut formatted = source.clone();

    if let Some(meters) = number(source, "distance") {
        formatted.insert(
            "distance".to_owned(),
            json!({"meters": meters, "formatted": format_distance(Some(meters), unit)}),
        );
    }
    if let Some(seconds) = number(source, "duration") {
        formatted.insert(
            "duration".to_owned(),
            json!({"seconds": seconds, "formatted": format_duration(Some(seconds))}),
        );
    }
    if let Some(meters) = number(source, "elevationGain") {
        formatted.insert(
            "elevationGain".to_owned(),
            json!({"meters": meters, "formatted": format_elevation(Some(meters), unit)}),
        );
    }
    if let Some(mps) = number(source, "averageSpeed") {
        formatted.insert(
            "averageSpeed".to_owned(),
            json!({
                "mps": mps,
                "formatted_speed": format_speed(Some(mps), unit),
                "formatted_pace": format_pace(Some(mps), unit),
            }),
        );
    }
    for field in ["startTimeLocal", "startTimeGMT", "endTimeLocal"] {
        if let Some(with_day) = source
            .get(field)
            .and_then(Value::as_str)
            .and_then(format_date_with_day)
        {
            formatted.insert(field.to_owned(), json!(with_day));
        }
    }

    let mut heart_rate = Map::new();
    if let Some(avg) = number(source, "averageHR") {
        heart_rate.insert("avg_bpm".to_owned(), json!(avg.round() as i64));
    }
    if let Some(max) = number(source, "maxHR") {
        heart_rate.insert("max_bpm".to_owned(), json!(max.round() as i64));
    }
    if !heart_rate.is_empty() {
        formatted.insert("heart_rate".to_owned(), Value::Object(heart_rate));
    }

    let mut power = Map::new();
    if let Some(avg) = number(source, "avgPower") {
        power.insert("avg_watts".to_owned(), json!(avg.round() as i64));
    }
    if let Some(max) = number(source, "maxPower") {
        power.insert("max_watts".to_owned(), json!(max.round() as i64));
    }
    if !power.is_empty() {
        formatted.insert("power".to_owned(), Value::Object(power));
    }

    if let Some(spm) = number(source, "averageRunningCadenceInStepsPerMinute") {
        formatted.insert("cadence".to_owned(), json!({"avg_spm": spm.round() as i64}));
    } else if let Some(rpm) = number(source, "averageBikingCadenceInRevPerMinute") {
        formatted.insert("cadence".to_owned(), json!({"avg_rpm": rpm.round() as i64}));
    }

    Value::Object(formatted)
}
