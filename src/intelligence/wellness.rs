// ABOUTME: Compacts Garmin daily wellness payloads (sleep, stress, heart rate, steps, HRV, weight)
// ABOUTME: Drops time-series arrays and derives the summary numbers and insights tools report
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)] // Safe: step counts and day counts fit in f64 exactly

use garmin_core::units::{format_thousands, format_weight, UnitSystem};
use serde_json::{json, Map, Value};

use super::activity::number;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Daily average SpO2 below this is called out
const LOW_SPO2_PERCENT: f64 = 90.0;

/// Label for an average stress level on Garmin's 0-100 scale
#[must_use]
pub const fn stress_label(average: i64) -> &'static str {
    if average < 25 {
        "low"
    } else if average < 50 {
        "moderate"
    } else if average < 75 {
        "high"
    } else {
        "very_high"
    }
}

fn hours(seconds: Option<f64>) -> Option<f64> {
    seconds.map(|s| (s / SECONDS_PER_HOUR * 10.0).round() / 10.0)
}

/// Copy non-null fields under new names
pub(crate) fn copy_fields(source: &Value, fields: &[(&str, &str)]) -> Map<String, Value> {
    let mut out = Map::new();
    for (from, to) in fields {
        if let Some(value) = source.get(*from).filter(|v| !v.is_null()) {
            out.insert((*to).to_owned(), value.clone());
        }
    }
    out
}

/// Daily summary: steps, calories, distance, stress, and body battery totals
#[must_use]
pub fn summarize_daily_summary(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    Value::Object(copy_fields(
        raw,
        &[
            ("totalSteps", "steps"),
            ("dailyStepGoal", "step_goal"),
            ("totalDistanceMeters", "distance_meters"),
            ("activeKilocalories", "active_calories"),
            ("totalKilocalories", "total_calories"),
            ("floorsAscended", "floors_ascended"),
            ("moderateIntensityMinutes", "moderate_intensity_minutes"),
            ("vigorousIntensityMinutes", "vigorous_intensity_minutes"),
            ("restingHeartRate", "resting_heart_rate"),
            ("averageStressLevel", "average_stress"),
            ("bodyBatteryHighestValue", "body_battery_high"),
            ("bodyBatteryLowestValue", "body_battery_low"),
        ],
    ))
}

/// Sleep: duration and stage breakdown in hours plus scores
#[must_use]
pub fn summarize_sleep(raw: &Value) -> Value {
    let Some(dto) = raw.get("dailySleepDTO").filter(|dto| !dto.is_null()) else {
        return Value::Null;
    };
    let mut sleep = Map::new();
    sleep.insert(
        "total_hours".to_owned(),
        json!(hours(number(dto, "sleepTimeSeconds"))),
    );
    sleep.insert(
        "deep_hours".to_owned(),
        json!(hours(number(dto, "deepSleepSeconds"))),
    );
    sleep.insert(
        "light_hours".to_owned(),
        json!(hours(number(dto, "lightSleepSeconds"))),
    );
    sleep.insert(
        "rem_hours".to_owned(),
        json!(hours(number(dto, "remSleepSeconds"))),
    );
    sleep.insert(
        "awake_minutes".to_owned(),
        json!(number(dto, "awakeSleepSeconds").map(|s| (s / 60.0).round())),
    );
    if let Some(scores) = dto.get("sleepScores") {
        let score = |key: &str| scores.get(key).and_then(|s| s.get("value")).cloned();
        sleep.insert(
            "scores".to_owned(),
            json!({
                "overall": score("overall"),
                "quality": score("quality"),
                "duration": score("duration"),
                "recovery": score("recovery"),
            }),
        );
    }
    sleep.extend(copy_fields(
        raw,
        &[
            ("restlessMomentsCount", "restless_moments"),
            ("avgOvernightHrv", "average_overnight_hrv"),
            ("restingHeartRate", "resting_heart_rate"),
            ("bodyBatteryChange", "body_battery_change"),
        ],
    ));
    Value::Object(sleep)
}

/// Stress: average and maximum with a level label
#[must_use]
pub fn summarize_stress(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    let mut stress = copy_fields(
        raw,
        &[
            ("avgStressLevel", "average"),
            ("maxStressLevel", "max"),
        ],
    );
    if let Some(average) = raw.get("avgStressLevel").and_then(Value::as_i64) {
        stress.insert("level".to_owned(), json!(stress_label(average)));
    }
    Value::Object(stress)
}

/// Heart rate: resting, min, max, and seven-day resting average
#[must_use]
pub fn summarize_heart_rate(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    let mut heart_rate = copy_fields(
        raw,
        &[
            ("restingHeartRate", "resting"),
            ("minHeartRate", "min"),
            ("maxHeartRate", "max"),
            ("lastSevenDaysAvgRestingHeartRate", "resting_7d_average"),
        ],
    );
    if let Some(readings) = raw.get("heartRateValues").and_then(Value::as_array) {
        heart_rate.insert("readings".to_owned(), json!(readings.len()));
    }
    Value::Object(heart_rate)
}

/// Body battery: charged and drained for the day
#[must_use]
pub fn summarize_body_battery(raw: &Value) -> Value {
    let report = match raw {
        Value::Array(reports) => reports.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    if report.is_null() {
        return Value::Null;
    }
    Value::Object(copy_fields(
        &report,
        &[("charged", "charged"), ("drained", "drained")],
    ))
}

/// HRV: last night, weekly average, and status
#[must_use]
pub fn summarize_hrv(raw: &Value) -> Value {
    let Some(summary) = raw.get("hrvSummary").filter(|s| !s.is_null()) else {
        return Value::Null;
    };
    Value::Object(copy_fields(
        summary,
        &[
            ("lastNightAvg", "last_night_average"),
            ("lastNight5MinHigh", "last_night_5min_high"),
            ("weeklyAvg", "weekly_average"),
            ("status", "status"),
        ],
    ))
}

/// Respiration: breaths per minute while awake and asleep
#[must_use]
pub fn summarize_respiration(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    Value::Object(copy_fields(
        raw,
        &[
            ("lowestRespirationValue", "lowest"),
            ("highestRespirationValue", "highest"),
            ("avgWakingRespirationValue", "average_waking"),
            ("avgSleepRespirationValue", "average_sleep"),
        ],
    ))
}

/// SpO2: saturation percent over the day and overnight
#[must_use]
pub fn summarize_spo2(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    Value::Object(copy_fields(
        raw,
        &[
            ("averageSpO2", "average"),
            ("lowestSpO2", "lowest"),
            ("latestSpO2", "latest"),
            ("avgSleepSpO2", "average_sleep"),
            ("lastSevenDaysAvgSpO2", "average_7d"),
        ],
    ))
}

/// Hydration: intake against goal in milliliters
#[must_use]
pub fn summarize_hydration(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    let mut hydration = copy_fields(
        raw,
        &[
            ("valueInML", "intake_ml"),
            ("goalInML", "goal_ml"),
            ("sweatLossInML", "sweat_loss_ml"),
        ],
    );
    if let (Some(intake), Some(goal)) = (number(raw, "valueInML"), number(raw, "goalInML")) {
        if goal > 0.0 {
            hydration.insert(
                "goal_progress_percent".to_owned(),
                json!((intake / goal * 100.0).round()),
            );
        }
    }
    Value::Object(hydration)
}

/// Floors: ascended and descended summed over the day's intervals
///
/// Each row of `floorValuesArray` is `[start, end, ascended, descended]`.
#[must_use]
pub fn summarize_floors(raw: &Value) -> Value {
    let Some(rows) = raw.get("floorValuesArray").and_then(Value::as_array) else {
        return Value::Null;
    };
    let column = |index: usize| -> i64 {
        rows.iter()
            .filter_map(|row| row.get(index).and_then(Value::as_f64))
            .sum::<f64>()
            .round() as i64
    };
    json!({
        "ascended": column(2),
        "descended": column(3),
        "intervals": rows.len(),
    })
}

/// Resting heart rate from the user stats service
#[must_use]
pub fn summarize_resting_heart_rate(raw: &Value) -> Value {
    raw.pointer("/allMetrics/metricsMap/WELLNESS_RESTING_HEART_RATE/0/value")
        .and_then(Value::as_f64)
        .map_or(Value::Null, |value| json!({"resting": value.round() as i64}))
}

/// Body battery events: what charged or drained it, and by how much
#[must_use]
pub fn summarize_body_battery_events(raw: &Value) -> Value {
    let Some(entries) = raw.as_array() else {
        return Value::Null;
    };
    let events: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let event = entry.get("event").unwrap_or(entry);
            let mut out = copy_fields(
                event,
                &[
                    ("eventType", "type"),
                    ("eventStartTimeGmt", "start"),
                    ("bodyBatteryImpact", "impact"),
                    ("feedbackType", "feedback"),
                ],
            );
            if let Some(ms) = number(event, "durationInMilliseconds") {
                out.insert("duration_minutes".to_owned(), json!((ms / 60_000.0).round()));
            }
            Value::Object(out)
        })
        .collect();
    json!({"count": events.len(), "events": events})
}

/// Auto-detected events of the day
#[must_use]
pub fn summarize_all_day_events(raw: &Value) -> Value {
    let Some(entries) = raw.as_array() else {
        return Value::Null;
    };
    let events: Vec<Value> = entries
        .iter()
        .map(|entry| {
            Value::Object(copy_fields(
                entry,
                &[
                    ("activityType", "type"),
                    ("startTimestampLocal", "start"),
                    ("duration", "duration_ms"),
                ],
            ))
        })
        .collect();
    json!({"count": events.len(), "events": events})
}

/// One day of step data
#[derive(Debug, Clone, PartialEq)]
pub struct StepDay {
    /// `calendarDate`
    pub date: String,
    /// Steps taken
    pub steps: i64,
    /// Step goal, zero when unset
    pub goal: i64,
    /// Meters walked
    pub distance: Option<f64>,
}

impl StepDay {
    /// Parse one entry of the daily steps endpoint
    #[must_use]
    pub fn from_json(raw: &Value) -> Self {
        Self {
            date: raw
                .get("calendarDate")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_owned(),
            steps: raw.get("totalSteps").and_then(Value::as_i64).unwrap_or(0),
            goal: raw.get("stepGoal").and_then(Value::as_i64).unwrap_or(0),
            distance: number(raw, "totalDistance"),
        }
    }

    /// Envelope representation
    #[must_use]
    pub fn to_json(&self) -> Value {
        let progress = (self.goal > 0)
            .then(|| (self.steps as f64 / self.goal as f64 * 100.0).round());
        json!({
            "date": self.date,
            "steps": self.steps,
            "goal": self.goal,
            "goal_progress_percent": progress,
            "goal_met": self.goal > 0 && self.steps >= self.goal,
            "distance_meters": self.distance,
        })
    }
}

/// Totals, average, goal rate, and best day insights for a run of step days
#[must_use]
pub fn step_insights(days: &[StepDay]) -> Vec<String> {
    if days.is_empty() {
        return vec!["No steps data available".to_owned()];
    }
    let total: i64 = days.iter().map(|d| d.steps).sum();
    let average = total as f64 / days.len() as f64;
    let mut insights = vec![
        format!("Total steps: {}", format_thousands(total)),
        format!("Average steps per day: {}", format_thousands(average.round() as i64)),
    ];

    let with_goal = days.iter().filter(|d| d.goal > 0).count();
    if with_goal > 0 {
        let met = days.iter().filter(|d| d.goal > 0 && d.steps >= d.goal).count();
        let rate = met as f64 / with_goal as f64 * 100.0;
        insights.push(format!(
            "Goal achieved on {met}/{with_goal} days ({rate:.0}%)"
        ));
    }
    if let Some(best) = days.iter().filter(|d| d.steps > 0).max_by_key(|d| d.steps) {
        insights.push(format!(
            "Best day: {} ({} steps)",
            best.date,
            format_thousands(best.steps)
        ));
    }
    insights
}

/// One weigh-in
#[derive(Debug, Clone, PartialEq)]
pub struct WeighIn {
    /// Day of the measurement
    pub date: String,
    /// Grams
    pub weight: f64,
    /// Body mass index when recorded
    pub bmi: Option<f64>,
    /// Body fat percent when recorded
    pub body_fat: Option<f64>,
}

impl WeighIn {
    /// Flatten the weigh-ins endpoint into one entry per day, newest first
    #[must_use]
    pub fn list_from_json(raw: &Value) -> Vec<Self> {
        raw.get("dailyWeightSummaries")
            .and_then(Value::as_array)
            .map(|days| {
                days.iter()
                    .filter_map(|day| {
                        let latest = day.get("latestWeight")?;
                        Some(Self {
                            date: day
                                .get("summaryDate")
                                .and_then(Value::as_str)
                                .or_else(|| latest.get("calendarDate").and_then(Value::as_str))?
                                .to_owned(),
                            weight: number(latest, "weight")?,
                            bmi: number(latest, "bmi"),
                            body_fat: number(latest, "bodyFat"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Envelope representation
    #[must_use]
    pub fn to_json(&self, unit: UnitSystem) -> Value {
        json!({
            "date": self.date,
            "weight": {"grams": self.weight, "formatted": format_weight(Some(self.weight), unit)},
            "bmi": self.bmi,
            "body_fat_percent": self.body_fat,
        })
    }
}

/// Change between the oldest and newest weigh-in of a newest-first list
#[must_use]
pub fn weight_insights(weigh_ins: &[WeighIn], unit: UnitSystem) -> Vec<String> {
    match (weigh_ins.first(), weigh_ins.last()) {
        (Some(newest), Some(oldest)) if weigh_ins.len() >= 2 => {
            let change = newest.weight - oldest.weight;
            let direction = if change.abs() < 1.0 {
                "Weight stable"
            } else if change > 0.0 {
                "Weight up"
            } else {
                "Weight down"
            };
            vec![
                format!("{} weigh-ins recorded", weigh_ins.len()),
                format!(
                    "{direction}: {} from {} to {}",
                    format_weight(Some(change.abs()), unit),
                    oldest.date,
                    newest.date
                ),
            ]
        }
        (Some(only), _) => vec![format!(
            "1 weigh-in recorded: {} on {}",
            format_weight(Some(only.weight), unit),
            only.date
        )],
        _ => vec!["No weigh-ins recorded in this period".to_owned()],
    }
}

/// Insights for one compacted day of `get_daily_health` output
#[must_use]
pub fn daily_health_insights(day: &Value) -> Vec<String> {
    let date = day.get("date").and_then(Value::as_str).unwrap_or("this day");
    let mut insights = Vec::new();

    let summary = &day["summary"];
    if let (Some(steps), Some(goal)) = (
        summary.get("steps").and_then(Value::as_i64),
        summary.get("step_goal").and_then(Value::as_i64),
    ) {
        if goal > 0 && steps >= goal {
            insights.push(format!("{date}: step goal reached ({} steps)", format_thousands(steps)));
        } else if goal > 0 {
            insights.push(format!(
                "{date}: {} steps, {} short of goal",
                format_thousands(steps),
                format_thousands(goal - steps)
            ));
        }
    }
    if let Some(total) = day["sleep"].get("total_hours").and_then(Value::as_f64) {
        if total < 7.0 {
            insights.push(format!("{date}: short sleep ({total:.1} h)"));
        }
    }
    if let Some(level) = day["stress"].get("level").and_then(Value::as_str) {
        if matches!(level, "high" | "very_high") {
            insights.push(format!("{date}: {} average stress", level.replace('_', " ")));
        }
    }
    if let Some(average) = day["spo2"].get("average").and_then(Value::as_f64) {
        if average < LOW_SPO2_PERCENT {
            insights.push(format!("{date}: low blood oxygen (average {average:.0}%)"));
        }
    }
    if let Some(progress) = day["hydration"]
        .get("goal_progress_percent")
        .and_then(Value::as_f64)
    {
        if progress >= 100.0 {
            insights.push(format!("{date}: hydration goal reached"));
        }
    }
    insights
}

/// One blood pressure measurement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodPressureReading {
    /// Local timestamp of the measurement
    pub timestamp: String,
    /// mmHg
    pub systolic: i64,
    /// mmHg
    pub diastolic: i64,
    /// Beats per minute, when measured
    pub pulse: Option<i64>,
    /// Garmin's category name, e.g. `STAGE_1_HIGH`
    pub category: Option<String>,
}

impl BloodPressureReading {
    /// Flatten the blood pressure endpoint's daily summaries, newest first
    #[must_use]
    pub fn list_from_json(raw: &Value) -> Vec<Self> {
        let mut readings: Vec<Self> = raw
            .get("measurementSummaries")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|summary| summary.get("measurements").and_then(Value::as_array))
            .flatten()
            .filter_map(|measurement| {
                Some(Self {
                    timestamp: measurement
                        .get("measurementTimestampLocal")
                        .and_then(Value::as_str)?
                        .to_owned(),
                    systolic: measurement.get("systolic").and_then(Value::as_i64)?,
                    diastolic: measurement.get("diastolic").and_then(Value::as_i64)?,
                    pulse: measurement.get("pulse").and_then(Value::as_i64),
                    category: measurement
                        .get("categoryName")
                        .or_else(|| measurement.get("category"))
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                })
            })
            .collect();
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings
    }

    /// Envelope representation
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "timestamp": self.timestamp,
            "systolic": self.systolic,
            "diastolic": self.diastolic,
            "pulse": self.pulse,
            "category": self.category,
        })
    }
}

/// Count, average, and peak insights for a set of readings
#[must_use]
pub fn blood_pressure_insights(readings: &[BloodPressureReading]) -> Vec<String> {
    if readings.is_empty() {
        return vec!["No blood pressure readings in this period".to_owned()];
    }
    let count = readings.len() as f64;
    let systolic = readings.iter().map(|r| r.systolic as f64).sum::<f64>() / count;
    let diastolic = readings.iter().map(|r| r.diastolic as f64).sum::<f64>() / count;
    let mut insights = vec![format!(
        "{} readings, average {systolic:.0}/{diastolic:.0} mmHg",
        readings.len()
    )];
    if let Some(peak) = readings.iter().max_by_key(|r| r.systolic) {
        insights.push(format!(
            "Highest: {}/{} mmHg at {}",
            peak.systolic, peak.diastolic, peak.timestamp
        ));
    }
    insights
}

/// One body composition entry with masses formatted in `unit`
#[must_use]
pub fn summarize_body_composition(raw: &Value, unit: UnitSystem) -> Value {
    let mut entry = copy_fields(
        raw,
        &[
            ("calendarDate", "date"),
            ("bmi", "bmi"),
            ("bodyFat", "body_fat_percent"),
            ("bodyWater", "body_water_percent"),
            ("visceralFat", "visceral_fat"),
            ("metabolicAge", "metabolic_age"),
        ],
    );
    for (from, to) in [
        ("weight", "weight"),
        ("muscleMass", "muscle_mass"),
        ("boneMass", "bone_mass"),
    ] {
        if let Some(grams) = number(raw, from) {
            entry.insert(
                to.to_owned(),
                json!({"grams": grams, "formatted": format_weight(Some(grams), unit)}),
            );
        }
    }
    Value::Object(entry)
}

/// Entries of the body composition endpoint, newest first
#[must_use]
pub fn body_composition_entries(raw: &Value) -> Vec<Value> {
    let mut entries: Vec<Value> = raw
        .get("dateWeightList")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    entries.sort_by(|a, b| {
        let day = |v: &Value| v.get("calendarDate").and_then(Value::as_str).map(str::to_owned);
        day(b).cmp(&day(a))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_summary_hours() {
        let raw = json!({
            "dailySleepDTO": {
                "sleepTimeSeconds": 27_000,
                "deepSleepSeconds": 5400,
                "sleepScores": {"overall": {"value": 82}}
            },
            "restingHeartRate": 48,
            "sleepMovement": [1, 2, 3]
        });
        let sleep = summarize_sleep(&raw);
        assert_eq!(sleep["total_hours"], json!(7.5));
        assert_eq!(sleep["deep_hours"], json!(1.5));
        assert_eq!(sleep["scores"]["overall"], json!(82));
        assert_eq!(sleep["resting_heart_rate"], json!(48));
        assert!(sleep.get("sleepMovement").is_none());
    }

    #[test]
    fn test_floors_sum_intervals() {
        let raw = json!({"floorValuesArray": [
            ["2024-01-15T08:00:00.0", "2024-01-15T08:15:00.0", 3, 1],
            ["2024-01-15T12:00:00.0", "2024-01-15T12:15:00.0", 5, 6],
        ]});
        let floors = summarize_floors(&raw);
        assert_eq!(floors["ascended"], json!(8));
        assert_eq!(floors["descended"], json!(7));
        assert_eq!(floors["intervals"], json!(2));
        assert!(summarize_floors(&Value::Null).is_null());
    }

    #[test]
    fn test_blood_pressure_flattens_newest_first() {
        let raw = json!({"measurementSummaries": [
            {"measurements": [
                {"measurementTimestampLocal": "2024-01-10T08:00:00.0", "systolic": 118, "diastolic": 76, "pulse": 60},
            ]},
            {"measurements": [
                {"measurementTimestampLocal": "2024-01-14T08:00:00.0", "systolic": 132, "diastolic": 84, "categoryName": "STAGE_1_HIGH"},
                {"measurementTimestampLocal": "2024-01-14T20:00:00.0", "diastolic": 80},
            ]},
        ]});
        let readings = BloodPressureReading::list_from_json(&raw);
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].systolic, 132);
        assert_eq!(readings[0].category.as_deref(), Some("STAGE_1_HIGH"));
        let insights = blood_pressure_insights(&readings);
        assert_eq!(insights[0], "2 readings, average 125/80 mmHg");
        assert_eq!(insights[1], "Highest: 132/84 mmHg at 2024-01-14T08:00:00.0");
    }

    #[test]
    fn test_step_insights() {
        let days = [
            StepDay::from_json(&json!({"calendarDate": "2024-01-14", "totalSteps": 12_000, "stepGoal": 10_000})),
            StepDay::from_json(&json!({"calendarDate": "2024-01-15", "totalSteps": 8000, "stepGoal": 10_000})),
        ];
        let insights = step_insights(&days);
        assert_eq!(insights[0], "Total steps: 20,000");
        assert_eq!(insights[1], "Average steps per day: 10,000");
        assert_eq!(insights[2], "Goal achieved on 1/2 days (50%)");
        assert_eq!(insights[3], "Best day: 2024-01-14 (12,000 steps)");
    }

    #[test]
    fn test_weight_change() {
        let raw = json!({"dailyWeightSummaries": [
            {"summaryDate": "2024-01-15", "latestWeight": {"weight": 74_000.0}},
            {"summaryDate": "2024-01-01", "latestWeight": {"weight": 75_500.0}}
        ]});
        let weigh_ins = WeighIn::list_from_json(&raw);
        let insights = weight_insights(&weigh_ins, UnitSystem::Metric);
        assert_eq!(insights[1], "Weight down: 1.50 kg from 2024-01-01 to 2024-01-15");
    }

    #[test]
    fn test_daily_health_insights() {
        let day = json!({
            "date": "2024-01-15",
            "summary": {"steps": 6500, "step_goal": 10_000},
            "sleep": {"total_hours": 6.2},
            "stress": {"level": "very_high"},
            "hrv": null
        });
        assert_eq!(
            daily_health_insights(&day),
            vec![
                "2024-01-15: 6,500 steps, 3,500 short of goal",
                "2024-01-15: short sleep (6.2 h)",
                "2024-01-15: very high average stress",
            ]
        );
    }

    #[test]
    fn test_stress_labels() {
        assert_eq!(stress_label(10), "low");
        assert_eq!(stress_label(60), "high");
        assert_eq!(summarize_stress(&json!({"avgStressLevel": 30}))["level"], "moderate");
    }
}
