// ABOUTME: Training tools: performance metrics, training effect, and training status/readiness
// ABOUTME: Every sub-metric is fetched independently so one missing metric never hides the others
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use async_trait::async_trait;
use garmin_core::envelope::ResponseEnvelope;
use garmin_providers::ApiCall;
use serde_json::{json, Map, Value};

use crate::errors::{AppError, AppResult};
use crate::intelligence::training_effect;
use crate::intelligence::wellness::summarize_hrv;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::{
    date_or_today, optional_bool, optional_str, optional_u64, time_range, unsupported,
};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

/// First element of an array payload, or the payload itself
fn first_entry(raw: &Value) -> &Value {
    match raw {
        Value::Array(entries) => entries.first().unwrap_or(&Value::Null),
        other => other,
    }
}

/// VO2 max for running and cycling from the max-metrics payload
fn summarize_vo2_max(raw: &Value) -> Value {
    let entry = first_entry(raw);
    let pick = |sport: &str| {
        let metrics = entry.get(sport)?;
        metrics
            .get("vo2MaxPreciseValue")
            .or_else(|| metrics.get("vo2MaxValue"))
            .filter(|v| !v.is_null())
            .cloned()
    };
    match (pick("generic"), pick("cycling")) {
        (None, None) => Value::Null,
        (running, cycling) => json!({"running": running, "cycling": cycling}),
    }
}

/// Training readiness score and its main factors
fn summarize_readiness(raw: &Value) -> Value {
    let entry = first_entry(raw);
    if entry.is_null() {
        return Value::Null;
    }
    let mut readiness = Map::new();
    for (from, to) in [
        ("score", "score"),
        ("level", "level"),
        ("feedbackShort", "feedback"),
        ("recoveryTime", "recovery_time_minutes"),
        ("sleepScore", "sleep_score"),
        ("hrvFactorPercent", "hrv_factor_percent"),
        ("acuteLoad", "acute_load"),
    ] {
        if let Some(value) = entry.get(from).filter(|v| !v.is_null()) {
            readiness.insert(to.to_owned(), value.clone());
        }
    }
    Value::Object(readiness)
}

/// Names of the entries of `data` that hold a value
fn available(data: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter(|key| data.get(**key).is_some_and(|v| !v.is_null()))
        .map(|key| (*key).to_owned())
        .collect()
}

fn availability_insight(present: &[String]) -> String {
    if present.is_empty() {
        "No performance metrics available for this period".to_owned()
    } else {
        format!("Available performance metrics: {}", present.join(", "))
    }
}

// ============================================================================
// GetPerformanceMetricsTool
// ============================================================================

/// Tool for VO2 max, HRV, and fitness age on a date, or hill and endurance
/// scores over a range.
pub struct GetPerformanceMetricsTool;

#[async_trait]
impl McpTool for GetPerformanceMetricsTool {
    fn name(&self) -> &'static str {
        "get_performance_metrics"
    }

    fn description(&self) -> &'static str {
        "Performance metrics. With a date: VO2 max, HRV, fitness age. With a period or \
         start_date+end_date: hill score and endurance score."
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "date".to_owned(),
            PropertySchema::new("string", "Day for single-date metrics. Default: today"),
        );
        properties.insert(
            "period".to_owned(),
            PropertySchema::new("string", "Period for range metrics, e.g. '30d'"),
        );
        properties.insert(
            "start_date".to_owned(),
            PropertySchema::new("string", "Range start (YYYY-MM-DD)"),
        );
        properties.insert(
            "end_date".to_owned(),
            PropertySchema::new("string", "Range end (YYYY-MM-DD)"),
        );
        for flag in [
            "include_vo2_max",
            "include_hrv",
            "include_fitness_age",
            "include_hill_score",
            "include_endurance_score",
        ] {
            properties.insert(
                flag.to_owned(),
                PropertySchema::new("boolean", "Include this metric. Default: true"),
            );
        }
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let today = ctx.today();
        let range = if optional_str(&args, "date").is_some() {
            None
        } else {
            time_range(&args, today)?
        };

        let mut data = Map::new();
        let envelope = if let Some(range) = range {
            data.insert("start_date".to_owned(), json!(range.start_str()));
            data.insert("end_date".to_owned(), json!(range.end_str()));
            if optional_bool(&args, "include_hill_score", true) {
                let call = ApiCall::HillScore {
                    start: range.start,
                    end: range.end,
                };
                data.insert(
                    "hill_score".to_owned(),
                    ctx.call_optional(self.name(), "hill_score", call).await,
                );
            }
            if optional_bool(&args, "include_endurance_score", true) {
                let call = ApiCall::EnduranceScore {
                    start: range.start,
                    end: range.end,
                };
                data.insert(
                    "endurance_score".to_owned(),
                    ctx.call_optional(self.name(), "endurance_score", call).await,
                );
            }
            let present = available(&data, &["hill_score", "endurance_score"]);
            ResponseEnvelope::new(Value::Object(data))
                .with_insights(vec![availability_insight(&present)])
                .with_metadata("mode", "range")
                .with_metadata("period", range.description)
        } else {
            let date = date_or_today(&args, today)?;
            data.insert("date".to_owned(), json!(date.to_string()));
            if optional_bool(&args, "include_vo2_max", true) {
                let raw = ctx
                    .call_optional(self.name(), "vo2_max", ApiCall::MaxMetrics(date))
                    .await;
                data.insert("vo2_max".to_owned(), summarize_vo2_max(&raw));
            }
            if optional_bool(&args, "include_hrv", true) {
                let raw = ctx
                    .call_optional(self.name(), "hrv", ApiCall::HrvData(date))
                    .await;
                data.insert("hrv".to_owned(), summarize_hrv(&raw));
            }
            if optional_bool(&args, "include_fitness_age", true) {
                data.insert(
                    "fitness_age".to_owned(),
                    ctx.call_optional(self.name(), "fitness_age", ApiCall::FitnessAge(date))
                        .await,
                );
            }
            let present = available(&data, &["vo2_max", "hrv", "fitness_age"]);
            ResponseEnvelope::new(Value::Object(data))
                .with_insights(vec![availability_insight(&present)])
                .with_metadata("mode", "single_date")
                .with_metadata("date", date.to_string())
        };

        Ok(ctx.render(envelope))
    }
}

// ============================================================================
// GetTrainingEffectTool
// ============================================================================

/// Tool for the training effect of one activity, or a progress summary over
/// a range.
pub struct GetTrainingEffectTool;

#[async_trait]
impl McpTool for GetTrainingEffectTool {
    fn name(&self) -> &'static str {
        "get_training_effect"
    }

    fn description(&self) -> &'static str {
        "Training effect of one activity (activity_id), or a progress summary for a metric \
         between start_date and end_date"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "activity_id".to_owned(),
            PropertySchema::new("integer", "Activity to read the training effect from"),
        );
        properties.insert(
            "start_date".to_owned(),
            PropertySchema::new("string", "Progress summary start (YYYY-MM-DD)"),
        );
        properties.insert(
            "end_date".to_owned(),
            PropertySchema::new("string", "Progress summary end (YYYY-MM-DD)"),
        );
        properties.insert(
            "metric".to_owned(),
            PropertySchema::new(
                "string",
                "Progress metric, e.g. 'distance', 'duration', 'elevationGain'. Default: distance",
            ),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        if let Some(activity_id) = optional_u64(&args, "activity_id")? {
            let activity = ctx.call(ApiCall::Activity(activity_id)).await?;
            if activity.is_null() {
                return Err(AppError::not_found(format!("Activity {activity_id}")));
            }
            let effect = training_effect(&activity);
            let insights = if effect.is_null() {
                vec!["No training effect recorded for this activity".to_owned()]
            } else {
                effect
                    .get("label")
                    .and_then(Value::as_str)
                    .map(|label| vec![format!("Training effect: {}", label.replace('_', " ").to_lowercase())])
                    .unwrap_or_default()
            };
            return Ok(ctx.render(
                ResponseEnvelope::new(json!({
                    "activity_id": activity_id,
                    "activity_name": activity.get("activityName"),
                    "training_effect": effect,
                }))
                .with_insights(insights)
                .with_metadata("mode", "activity"),
            ));
        }

        let Some(range) = time_range(&args, ctx.today())? else {
            return Err(unsupported(
                "Provide either activity_id or start_date and end_date",
                &[
                    "For training effect: provide activity_id",
                    "For progress summary: provide start_date, end_date, and optionally metric",
                ],
            ));
        };
        let metric = optional_str(&args, "metric").unwrap_or("distance").to_owned();
        let progress = ctx
            .call(ApiCall::ProgressSummary {
                start: range.start,
                end: range.end,
                metric: metric.clone(),
            })
            .await?;

        Ok(ctx.render(
            ResponseEnvelope::new(json!({
                "start_date": range.start_str(),
                "end_date": range.end_str(),
                "metric": metric,
                "progress": progress,
            }))
            .with_metadata("mode", "progress_summary")
            .with_metadata("period", range.description),
        ))
    }
}

// ============================================================================
// GetTrainingStatusTool
// ============================================================================

/// Tool for training readiness and training status on a date.
pub struct GetTrainingStatusTool;

#[async_trait]
impl McpTool for GetTrainingStatusTool {
    fn name(&self) -> &'static str {
        "get_training_status"
    }

    fn description(&self) -> &'static str {
        "Training readiness and training status (load, VO2 max trend) for a date. Default: today"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "date".to_owned(),
            PropertySchema::new("string", "'today', 'yesterday' or YYYY-MM-DD. Default: today"),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let date = date_or_today(&args, ctx.today())?;

        let readiness_raw = ctx
            .call_optional(self.name(), "training_readiness", ApiCall::TrainingReadiness(date))
            .await;
        let readiness = summarize_readiness(&readiness_raw);
        let status = ctx
            .call_optional(self.name(), "training_status", ApiCall::TrainingStatus(date))
            .await;
        let status = status
            .get("mostRecentTrainingStatus")
            .cloned()
            .unwrap_or(status);

        let mut insights = Vec::new();
        if let Some(score) = readiness.get("score").and_then(Value::as_i64) {
            match readiness.get("level").and_then(Value::as_str) {
                Some(level) => insights.push(format!(
                    "Training readiness: {score} ({})",
                    level.to_lowercase()
                )),
                None => insights.push(format!("Training readiness: {score}")),
            }
        }
        if readiness.is_null() && status.is_null() {
            insights.push("No training status data available for this date".to_owned());
        }

        Ok(ctx.render(
            ResponseEnvelope::new(json!({
                "date": date.to_string(),
                "training_readiness": readiness,
                "training_status": status,
            }))
            .with_insights(insights)
            .with_metadata("date", date.to_string()),
        ))
    }
}

// ============================================================================
// Tool factory
// ============================================================================

/// Create all training tools for registration
#[must_use]
pub fn create_training_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(GetPerformanceMetricsTool),
        Box::new(GetTrainingEffectTool),
        Box::new(GetTrainingStatusTool),
    ]
}
