// ABOUTME: Analysis tools that aggregate and compare activities fetched from Garmin Connect
// ABOUTME: Implements analyze_training_period, compare_activities, and find_similar_activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Tools
//!
//! Tools here fetch activities, then hand them to the `intelligence`
//! routines for totals, extremes, and similarity scores.

use std::collections::HashMap;

use async_trait::async_trait;
use garmin_core::constants::limits::{
    DEFAULT_SIMILAR_LIMIT, MAX_COMPARE_ACTIVITIES, MAX_PERIOD_ACTIVITIES, MAX_SIMILAR_LIMIT,
    MIN_COMPARE_ACTIVITIES, SIMILARITY_CANDIDATE_POOL,
};
use garmin_core::envelope::ResponseEnvelope;
use garmin_core::units::format_activity;
use garmin_providers::ApiCall;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::intelligence::{
    compare_activities, find_similar, parse_criteria, similarity_insights, ActivitySummary,
    TrainingPeriodAnalysis,
};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::{
    optional_str, optional_u32, required_u64, string_list, time_range_or, unit_system, unsupported,
};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

use super::into_list;

fn unit_property() -> PropertySchema {
    PropertySchema::one_of("Unit system", &["metric", "imperial"])
}

// ============================================================================
// AnalyzeTrainingPeriodTool
// ============================================================================

/// Tool for totals, type breakdown, and weekly trend over a period.
pub struct AnalyzeTrainingPeriodTool;

#[async_trait]
impl McpTool for AnalyzeTrainingPeriodTool {
    fn name(&self) -> &'static str {
        "analyze_training_period"
    }

    fn description(&self) -> &'static str {
        "Analyze training over a period: totals, breakdown by activity type, weekly trend, and insights"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "period".to_owned(),
            PropertySchema::new("string", "Period to analyze, e.g. '30d', 'last-month'. Default: 30d"),
        );
        properties.insert(
            "start_date".to_owned(),
            PropertySchema::new("string", "Range start (YYYY-MM-DD), used with end_date"),
        );
        properties.insert(
            "end_date".to_owned(),
            PropertySchema::new("string", "Range end (YYYY-MM-DD), used with start_date"),
        );
        properties.insert(
            "activity_type".to_owned(),
            PropertySchema::new("string", "Only analyze this activity type"),
        );
        properties.insert("unit".to_owned(), unit_property());
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER
            | ToolCapabilities::READS_DATA
            | ToolCapabilities::ANALYTICS
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let range = time_range_or(&args, ctx.today(), "30d")?;
        let unit = unit_system(&args, &ctx.config)?;
        let activity_type = optional_str(&args, "activity_type");

        let raw = into_list(
            ctx.call(ApiCall::SearchActivities {
                start: 0,
                limit: MAX_PERIOD_ACTIVITIES,
                activity_type: activity_type.map(str::to_owned),
                start_date: Some(range.start),
                end_date: Some(range.end),
            })
            .await?,
        );
        let activities: Vec<ActivitySummary> = raw.iter().map(ActivitySummary::from_json).collect();
        debug!(count = activities.len(), period = %range.description, "analyzing training period");

        let description = range.description.clone();
        let analysis = TrainingPeriodAnalysis::analyze(range, &activities);
        Ok(ctx.render(
            ResponseEnvelope::new(analysis.to_json(unit))
                .with_insights(analysis.insights())
                .with_metadata("period", description)
                .with_metadata("activity_type", activity_type.unwrap_or("all"))
                .with_metadata("unit", unit.as_str()),
        ))
    }
}

// ============================================================================
// CompareActivitiesTool
// ============================================================================

/// Tool for side-by-side comparison of two to five activities.
pub struct CompareActivitiesTool;

#[async_trait]
impl McpTool for CompareActivitiesTool {
    fn name(&self) -> &'static str {
        "compare_activities"
    }

    fn description(&self) -> &'static str {
        "Compare 2-5 activities side by side: distance, time, pace, elevation, and heart rate"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "activity_ids".to_owned(),
            PropertySchema::new("string", "Comma-separated activity ids (2 to 5)"),
        );
        properties.insert("unit".to_owned(), unit_property());
        JsonSchema::object(properties).with_required(&["activity_ids"])
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER
            | ToolCapabilities::READS_DATA
            | ToolCapabilities::ANALYTICS
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let unit = unit_system(&args, &ctx.config)?;
        let ids = parse_activity_ids(&args)?;

        let mut fetched = Vec::with_capacity(ids.len());
        for id in &ids {
            match ctx.call(ApiCall::Activity(*id)).await {
                Ok(activity) if !activity.is_null() => fetched.push(activity),
                Ok(_) => warn!(activity_id = id, "activity returned no data, skipping"),
                Err(e) => warn!(activity_id = id, error = %e, "could not fetch activity, skipping"),
            }
        }
        if fetched.len() < MIN_COMPARE_ACTIVITIES {
            return Err(AppError::insufficient_data(format!(
                "Could only fetch {} of {} activities",
                fetched.len(),
                ids.len()
            ))
            .with_suggestion("Check that the activity ids exist and belong to this account"));
        }

        let summaries: Vec<ActivitySummary> = fetched.iter().map(ActivitySummary::from_json).collect();
        let result = compare_activities(&summaries, unit);
        let activities: Vec<Value> = fetched.iter().map(|a| format_activity(a, unit)).collect();

        Ok(ctx.render(
            ResponseEnvelope::new(json!({
                "activities": activities,
                "comparison": result.comparison,
                "count": activities.len(),
            }))
            .with_insights(result.insights)
            .with_metadata("activity_ids", ids)
            .with_metadata("unit", unit.as_str()),
        ))
    }
}

/// Activity ids from a comma-separated string or a JSON array
fn parse_activity_ids(args: &Value) -> AppResult<Vec<u64>> {
    let raw = string_list(args, "activity_ids").unwrap_or_default();
    let mut ids = Vec::with_capacity(raw.len());
    for text in &raw {
        let id = text.parse::<u64>().map_err(|_| {
            AppError::invalid_argument(format!("Invalid activity id '{text}'"))
                .with_suggestion("Activity ids are numeric, e.g. '12345678901,12345678902'")
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if !(MIN_COMPARE_ACTIVITIES..=MAX_COMPARE_ACTIVITIES).contains(&ids.len()) {
        return Err(unsupported(
            &format!(
                "Provide between {MIN_COMPARE_ACTIVITIES} and {MAX_COMPARE_ACTIVITIES} activity ids, got {}",
                ids.len()
            ),
            &["Example: activity_ids='12345678901,12345678902'"],
        ));
    }
    Ok(ids)
}

// ============================================================================
// FindSimilarActivitiesTool
// ============================================================================

/// Tool for ranking recent activities by similarity to a reference.
pub struct FindSimilarActivitiesTool;

#[async_trait]
impl McpTool for FindSimilarActivitiesTool {
    fn name(&self) -> &'static str {
        "find_similar_activities"
    }

    fn description(&self) -> &'static str {
        "Find recent activities similar to a reference activity by type, distance, elevation, or duration"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "activity_id".to_owned(),
            PropertySchema::new("integer", "Reference activity id"),
        );
        properties.insert(
            "criteria".to_owned(),
            PropertySchema::new(
                "string",
                "Comma-separated criteria: type, distance, elevation, duration. Default: type,distance",
            ),
        );
        properties.insert(
            "limit".to_owned(),
            PropertySchema::new("integer", "Maximum matches (1-20). Default: 10"),
        );
        properties.insert("unit".to_owned(), unit_property());
        JsonSchema::object(properties).with_required(&["activity_id"])
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER
            | ToolCapabilities::READS_DATA
            | ToolCapabilities::ANALYTICS
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let activity_id = required_u64(&args, "activity_id")?;
        let unit = unit_system(&args, &ctx.config)?;
        let names = string_list(&args, "criteria")
            .unwrap_or_else(|| vec!["type".to_owned(), "distance".to_owned()]);
        let criteria = parse_criteria(&names)?;
        let limit = optional_u32(&args, "limit")?.unwrap_or(DEFAULT_SIMILAR_LIMIT);
        if !(1..=MAX_SIMILAR_LIMIT).contains(&limit) {
            return Err(unsupported(
                &format!("limit must be between 1 and {MAX_SIMILAR_LIMIT}, got {limit}"),
                &["Use the default of 10 by omitting limit"],
            ));
        }
        let criteria_names: Vec<&str> = criteria.iter().map(|c| c.as_str()).collect();

        let reference_raw = ctx.call(ApiCall::Activity(activity_id)).await?;
        if reference_raw.is_null() {
            return Err(AppError::not_found(format!("Activity {activity_id}")));
        }
        let reference = ActivitySummary::from_json(&reference_raw);

        let candidates_raw = into_list(
            ctx.call(ApiCall::SearchActivities {
                start: 0,
                limit: SIMILARITY_CANDIDATE_POOL,
                activity_type: None,
                start_date: None,
                end_date: None,
            })
            .await?,
        );

        let envelope = if candidates_raw.is_empty() {
            ResponseEnvelope::new(json!({
                "reference_activity": format_activity(&reference_raw, unit),
                "similar_activities": [],
                "count": 0,
            }))
            .with_insights(vec!["No activities available to compare".to_owned()])
        } else {
            let candidates: Vec<ActivitySummary> =
                candidates_raw.iter().map(ActivitySummary::from_json).collect();
            let matches = find_similar(&reference, &candidates, &criteria, limit as usize);
            let similar: Vec<Value> = matches
                .iter()
                .map(|m| {
                    json!({
                        "activity": format_activity(&candidates_raw[m.index], unit),
                        "similarity_score": m.score,
                        "differences": m.differences,
                    })
                })
                .collect();
            ResponseEnvelope::new(json!({
                "reference_activity": format_activity(&reference_raw, unit),
                "similar_activities": similar,
                "count": similar.len(),
            }))
            .with_insights(similarity_insights(&matches))
        };

        Ok(ctx.render(
            envelope
                .with_metadata("reference_activity_id", activity_id)
                .with_metadata("criteria", criteria_names)
                .with_metadata("limit", limit)
                .with_metadata("unit", unit.as_str()),
        ))
    }
}

// ============================================================================
// Tool factory
// ============================================================================

/// Create all analysis tools for registration
#[must_use]
pub fn create_analysis_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(AnalyzeTrainingPeriodTool),
        Box::new(CompareActivitiesTool),
        Box::new(FindSimilarActivitiesTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_ids_deduplicated_and_bounded() {
        let ids = parse_activity_ids(&json!({"activity_ids": "1, 2, 2"})).unwrap();
        assert_eq!(ids, vec![1, 2]);
        assert!(parse_activity_ids(&json!({"activity_ids": "1"})).is_err());
        assert!(parse_activity_ids(&json!({"activity_ids": "1,2,3,4,5,6"})).is_err());
        assert!(parse_activity_ids(&json!({"activity_ids": "1,abc"})).is_err());
    }
}
