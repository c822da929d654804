// ABOUTME: Record tools: personal records, race time predictions, goals, badges and challenges
// ABOUTME: Labels record types and formats times and distances for display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use async_trait::async_trait;
use garmin_core::envelope::ResponseEnvelope;
use garmin_core::units::{format_distance, format_duration, format_thousands, UnitSystem};
use garmin_providers::{ApiCall, ChallengeKind};
use serde_json::{json, Map, Value};

use crate::errors::AppResult;
use crate::intelligence::activity::number;
use crate::intelligence::wellness::copy_fields;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::{optional_str, page_limit, string_list, unit_system, unsupported};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

use super::into_list;

/// How a personal record value is measured
enum RecordKind {
    Time,
    Distance,
    Steps,
}

/// Label and measurement of a Garmin personal record type id
const fn record_type(type_id: i64) -> Option<(&'static str, RecordKind)> {
    match type_id {
        1 => Some(("run_1k", RecordKind::Time)),
        2 => Some(("run_1_mile", RecordKind::Time)),
        3 => Some(("run_5k", RecordKind::Time)),
        4 => Some(("run_10k", RecordKind::Time)),
        7 => Some(("longest_run", RecordKind::Distance)),
        8 => Some(("longest_ride", RecordKind::Distance)),
        12 => Some(("most_steps_day", RecordKind::Steps)),
        13 => Some(("most_steps_week", RecordKind::Steps)),
        14 => Some(("most_steps_month", RecordKind::Steps)),
        _ => None,
    }
}

/// One record with a label and a formatted value when the type is known
#[allow(clippy::cast_possible_truncation)] // Safe: step records are whole numbers
fn format_record(raw: &Value, unit: UnitSystem) -> Value {
    let type_id = raw.get("typeId").and_then(Value::as_i64).unwrap_or_default();
    let value = number(raw, "value");
    let (label, formatted) = match record_type(type_id) {
        Some((label, RecordKind::Time)) => (label.to_owned(), Some(format_duration(value))),
        Some((label, RecordKind::Distance)) => {
            (label.to_owned(), Some(format_distance(value, unit)))
        }
        Some((label, RecordKind::Steps)) => (
            label.to_owned(),
            value.map(|steps| format_thousands(steps.round() as i64)),
        ),
        None => (format!("type_{type_id}"), None),
    };
    json!({
        "type": label,
        "type_id": type_id,
        "value": value,
        "formatted": formatted,
        "activity_id": raw.get("activityId"),
        "activity_name": raw.get("activityName"),
        "date": raw.get("prStartTimeGmtFormatted").or_else(|| raw.get("actStartDateTimeInGMTFormatted")),
    })
}

// ============================================================================
// GetPersonalRecordsTool
// ============================================================================

/// Tool for personal records across activity types.
pub struct GetPersonalRecordsTool;

#[async_trait]
impl McpTool for GetPersonalRecordsTool {
    fn name(&self) -> &'static str {
        "get_personal_records"
    }

    fn description(&self) -> &'static str {
        "Personal records: fastest 1K/mile/5K/10K, longest run and ride, most steps"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "unit".to_owned(),
            PropertySchema::one_of("Unit system", &["metric", "imperial"]),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let unit = unit_system(&args, &ctx.config)?;
        let records: Vec<Value> = into_list(ctx.call(ApiCall::PersonalRecords).await?)
            .iter()
            .map(|record| format_record(record, unit))
            .collect();
        let count = records.len();
        Ok(ctx.render(
            ResponseEnvelope::new(json!({"records": records, "count": count}))
                .with_metadata("unit", unit.as_str()),
        ))
    }
}

// ============================================================================
// GetRacePredictionsTool
// ============================================================================

/// Tool for predicted race times.
pub struct GetRacePredictionsTool;

const RACE_FIELDS: [(&str, &str); 4] = [
    ("time5K", "5k"),
    ("time10K", "10k"),
    ("timeHalfMarathon", "half_marathon"),
    ("timeMarathon", "marathon"),
];

#[async_trait]
impl McpTool for GetRacePredictionsTool {
    fn name(&self) -> &'static str {
        "get_race_predictions"
    }

    fn description(&self) -> &'static str {
        "Predicted finish times for 5K, 10K, half marathon, and marathon"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(HashMap::new())
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, _args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let raw = ctx.call(ApiCall::RacePredictions).await?;
        let latest = match &raw {
            Value::Array(entries) => entries.first().cloned().unwrap_or(Value::Null),
            other => other.clone(),
        };

        let mut predictions = Map::new();
        for (from, to) in RACE_FIELDS {
            if let Some(seconds) = number(&latest, from) {
                predictions.insert(
                    to.to_owned(),
                    json!({"seconds": seconds, "formatted": format_duration(Some(seconds))}),
                );
            }
        }
        let insights = if predictions.is_empty() {
            vec!["No race predictions available yet".to_owned()]
        } else {
            Vec::new()
        };

        Ok(ctx.render(
            ResponseEnvelope::new(json!({
                "date": latest.get("calendarDate"),
                "predictions": predictions,
            }))
            .with_insights(insights),
        ))
    }
}

// ============================================================================
// GetGoalsTool
// ============================================================================

/// Tool for goals filtered by status.
pub struct GetGoalsTool;

const GOAL_STATUSES: [&str; 3] = ["active", "future", "past"];

#[async_trait]
impl McpTool for GetGoalsTool {
    fn name(&self) -> &'static str {
        "get_goals"
    }

    fn description(&self) -> &'static str {
        "List goals by status: active, future, or past. Default: active"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "status".to_owned(),
            PropertySchema::one_of("Goal status", &GOAL_STATUSES),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let status = optional_str(&args, "status").unwrap_or("active").to_lowercase();
        if !GOAL_STATUSES.contains(&status.as_str()) {
            return Err(unsupported(
                &format!("Unknown goal status '{status}'"),
                &["Valid statuses: active, future, past"],
            ));
        }
        let goals = into_list(
            ctx.call(ApiCall::Goals {
                status: status.clone(),
            })
            .await?,
        );
        let count = goals.len();
        Ok(ctx.render(
            ResponseEnvelope::new(json!({"goals": goals, "count": count}))
                .with_metadata("status", status),
        ))
    }
}

// ============================================================================
// GetBadgesAndChallengesTool
// ============================================================================

const EARNED_BADGES: &str = "earned_badges";

const BADGE_FIELDS: [(&str, &str); 6] = [
    ("badgeId", "badge_id"),
    ("badgeName", "name"),
    ("badgeEarnedDate", "earned_date"),
    ("badgePoints", "points"),
    ("badgeEarnedNumber", "times_earned"),
    ("badgeCategoryId", "category_id"),
];

const CHALLENGE_FIELDS: [(&str, &str); 8] = [
    ("uuid", "uuid"),
    ("challengeName", "name"),
    ("badgeChallengeName", "name"),
    ("adHocChallengeName", "name"),
    ("startDate", "start_date"),
    ("endDate", "end_date"),
    ("userProgress", "progress"),
    ("badgePoints", "points"),
];

/// Section keys accepted by `get_badges_and_challenges`, in output order
fn badge_sections() -> Vec<&'static str> {
    let mut sections = vec![EARNED_BADGES];
    sections.extend(ChallengeKind::ALL.into_iter().map(ChallengeKind::key));
    sections
}

fn compact_list(raw: &Value, fields: &[(&str, &str)]) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    let items: Vec<Value> = into_list(raw.clone())
        .iter()
        .map(|item| Value::Object(copy_fields(item, fields)))
        .collect();
    Value::Array(items)
}

/// Tool for earned badges and the challenge lists.
pub struct GetBadgesAndChallengesTool;

#[async_trait]
impl McpTool for GetBadgesAndChallengesTool {
    fn name(&self) -> &'static str {
        "get_badges_and_challenges"
    }

    fn description(&self) -> &'static str {
        "Earned badges plus ad-hoc, available, completed, non-completed badge challenges and \
         in-progress virtual challenges"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "sections".to_owned(),
            PropertySchema::new(
                "string",
                "Comma-separated subset of earned_badges, adhoc_challenges, \
                 available_badge_challenges, badge_challenges, non_completed_badge_challenges, \
                 in_progress_virtual_challenges. Default: all",
            ),
        );
        properties.insert(
            "limit".to_owned(),
            PropertySchema::new("integer", "Entries per challenge list"),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let limit = page_limit(&args, &ctx.config)?;
        let known = badge_sections();
        let requested = string_list(&args, "sections").unwrap_or_default();
        let unknown: Vec<&str> = requested
            .iter()
            .map(String::as_str)
            .filter(|s| *s != "all" && !known.contains(s))
            .collect();
        if !unknown.is_empty() {
            return Err(unsupported(
                &format!("Unknown sections: {}", unknown.join(", ")),
                &["Valid sections: earned_badges, adhoc_challenges, available_badge_challenges, \
                   badge_challenges, non_completed_badge_challenges, in_progress_virtual_challenges, all"],
            ));
        }
        let sections: Vec<&str> = if requested.is_empty() || requested.iter().any(|s| s == "all") {
            known
        } else {
            known
                .into_iter()
                .filter(|s| requested.iter().any(|r| r == s))
                .collect()
        };

        let mut data = Map::new();
        let mut insights = Vec::new();
        if sections.contains(&EARNED_BADGES) {
            let raw = ctx
                .call_optional(self.name(), EARNED_BADGES, ApiCall::EarnedBadges)
                .await;
            let badges = compact_list(&raw, &BADGE_FIELDS);
            if let Some(list) = badges.as_array() {
                let points: i64 = list
                    .iter()
                    .filter_map(|badge| badge.get("points").and_then(Value::as_i64))
                    .sum();
                insights.push(format!("{} badges earned, {points} points", list.len()));
            }
            data.insert(EARNED_BADGES.to_owned(), badges);
        }
        for kind in ChallengeKind::ALL {
            if !sections.contains(&kind.key()) {
                continue;
            }
            let call = ApiCall::Challenges {
                kind,
                start: 1,
                limit,
            };
            let raw = ctx.call_optional(self.name(), kind.key(), call).await;
            let challenges = compact_list(&raw, &CHALLENGE_FIELDS);
            if kind == ChallengeKind::InProgressVirtual {
                if let Some(list) = challenges.as_array() {
                    insights.push(format!("{} virtual challenges in progress", list.len()));
                }
            }
            data.insert(kind.key().to_owned(), challenges);
        }

        Ok(ctx.render(
            ResponseEnvelope::new(Value::Object(data))
                .with_insights(insights)
                .with_metadata("sections", sections)
                .with_metadata("limit", limit),
        ))
    }
}

// ============================================================================
// Tool factory
// ============================================================================

/// Create all record tools for registration
#[must_use]
pub fn create_record_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(GetPersonalRecordsTool),
        Box::new(GetRacePredictionsTool),
        Box::new(GetGoalsTool),
        Box::new(GetBadgesAndChallengesTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_labels() {
        let five_k = format_record(&json!({"typeId": 3, "value": 1500.0}), UnitSystem::Metric);
        assert_eq!(five_k["type"], "run_5k");
        assert_eq!(five_k["formatted"], "25m 0s");
        let unknown = format_record(&json!({"typeId": 99, "value": 1.0}), UnitSystem::Metric);
        assert_eq!(unknown["type"], "type_99");
        assert!(unknown["formatted"].is_null());
    }
}
