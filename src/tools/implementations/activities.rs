// ABOUTME: Activity query tools: flexible paginated activity search and single-activity details.
// ABOUTME: Implements query_activities and get_activity_details.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Activity Tools
//!
//! - `QueryActivitiesTool` - one entry point for by-id, by-date, by-range,
//!   recent, and cursor-continuation queries
//! - `GetActivityDetailsTool` - one activity with optional detail sections
//!
//! Paginated queries ask Garmin for `limit + 1` activities at
//! `(page - 1) * limit`; the extra activity only decides `has_more`.

use std::collections::HashMap;

use async_trait::async_trait;
use garmin_core::envelope::ResponseEnvelope;
use garmin_core::pagination::{paginate, CursorFilters, FilterValue, PageRequest};
use garmin_core::units::{format_activity, UnitSystem};
use garmin_providers::ApiCall;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::errors::AppResult;
use crate::intelligence::training_effect;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::paging::{date_filter, first_page, insert_range, resume_page, text_filter};
use crate::tools::params::{
    optional_str, page_limit, required_u64, string_list, unit_system, unsupported, QueryIntent,
};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

use super::into_list;

// ============================================================================
// Helper functions
// ============================================================================

/// Garmin search call for one page of a request
///
/// # Errors
///
/// Returns `InvalidCursor` when a stored date filter is malformed
pub fn search_call(request: &PageRequest) -> AppResult<ApiCall> {
    Ok(ApiCall::SearchActivities {
        start: request.offset(),
        limit: request.fetch_size(),
        activity_type: text_filter(request, "activity_type").map(str::to_owned),
        start_date: date_filter(request, "start_date")?,
        end_date: date_filter(request, "end_date")?,
    })
}

/// Filters echoed into metadata on every page, including continuations
const ECHOED_FILTERS: [&str; 3] = ["start_date", "end_date", "period"];

fn range_filters(activity_type: Option<&str>) -> CursorFilters {
    let mut filters = CursorFilters::new();
    if let Some(kind) = activity_type {
        filters.insert("activity_type".to_owned(), FilterValue::from(kind));
    }
    filters
}

// ============================================================================
// QueryActivitiesTool
// ============================================================================

/// Tool for listing and looking up activities.
pub struct QueryActivitiesTool;

impl QueryActivitiesTool {
    async fn by_id(
        ctx: &ToolExecutionContext,
        activity_id: u64,
        unit: UnitSystem,
    ) -> AppResult<ToolResult> {
        let activity = ctx.call(ApiCall::Activity(activity_id)).await?;
        Ok(ctx.render(
            ResponseEnvelope::new(json!({"activity": format_activity(&activity, unit)}))
                .with_metadata("query_type", "by_id")
                .with_metadata("activity_id", activity_id)
                .with_metadata("unit", unit.as_str()),
        ))
    }
}

#[async_trait]
impl McpTool for QueryActivitiesTool {
    fn name(&self) -> &'static str {
        "query_activities"
    }

    fn description(&self) -> &'static str {
        "Query activities by id, date, period, or date range, or list the most recent ones. \
         Results are paginated: pass pagination.cursor back as `cursor` for the next page."
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "activity_id".to_owned(),
            PropertySchema::new("integer", "Return this single activity"),
        );
        properties.insert(
            "date".to_owned(),
            PropertySchema::new("string", "Activities on one day: 'today', 'yesterday' or YYYY-MM-DD"),
        );
        properties.insert(
            "period".to_owned(),
            PropertySchema::new(
                "string",
                "Period: '7d', 'this-week', 'last-month', 'ytd', 'YYYY-MM-DD:YYYY-MM-DD'",
            ),
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
            PropertySchema::new("string", "Garmin activity type key, e.g. 'running', 'cycling'"),
        );
        properties.insert(
            "limit".to_owned(),
            PropertySchema::new("integer", "Activities per page"),
        );
        properties.insert(
            "cursor".to_owned(),
            PropertySchema::new("string", "Cursor from a previous page; other filters are ignored"),
        );
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
        let intent = QueryIntent::from_args(&args, ctx.today())?;
        let unit = unit_system(&args, &ctx.config)?;
        let limit = page_limit(&args, &ctx.config)?;
        let activity_type = optional_str(&args, "activity_type");
        let query_type = intent.label();
        debug!(intent = query_type, limit, "query_activities");

        let mut metadata = Map::new();
        let request = match intent {
            QueryIntent::ById(activity_id) => return Self::by_id(ctx, activity_id, unit).await,
            QueryIntent::ByDate(date) => {
                let mut filters = range_filters(activity_type);
                filters.insert("start_date".to_owned(), date.into());
                filters.insert("end_date".to_owned(), date.into());
                metadata.insert("date".to_owned(), json!(date.to_string()));
                first_page(limit, filters)
            }
            QueryIntent::ByRange(range) => {
                let mut filters = range_filters(activity_type);
                insert_range(&mut filters, &range);
                first_page(limit, filters)
            }
            QueryIntent::Recent => first_page(limit, range_filters(activity_type)),
            QueryIntent::Continuation(cursor) => resume_page(cursor, limit, &ctx.config),
        };
        for key in ECHOED_FILTERS {
            if let Some(value) = text_filter(&request, key) {
                metadata.insert(key.to_owned(), json!(value));
            }
        }

        let fetched = into_list(ctx.call(search_call(&request)?).await?);
        let page = paginate(fetched, &request)?;
        let activities: Vec<Value> = page
            .items
            .iter()
            .map(|activity| format_activity(activity, unit))
            .collect();
        let count = activities.len();

        let mut envelope = ResponseEnvelope::new(json!({
            "activities": activities,
            "count": count,
        }))
        .with_pagination(page.pagination)
        .with_metadata("query_type", query_type)
        .with_metadata("page", request.page)
        .with_metadata("unit", unit.as_str());
        if let Some(kind) = text_filter(&request, "activity_type") {
            envelope = envelope.with_metadata("activity_type", kind);
        }
        for (key, value) in metadata {
            envelope = envelope.with_metadata(key, value);
        }
        if count == 0 && request.page == 1 {
            envelope = envelope.with_insights(vec!["No activities found for this query".to_owned()]);
        }

        Ok(ctx.render(envelope))
    }
}

// ============================================================================
// GetActivityDetailsTool
// ============================================================================

/// Optional detail sections and the calls that fetch them
const SECTIONS: [&str; 7] = [
    "splits",
    "typed_splits",
    "split_summaries",
    "weather",
    "hr_zones",
    "gear",
    "exercise_sets",
];

fn section_call(section: &str, activity_id: u64) -> Option<ApiCall> {
    match section {
        "splits" => Some(ApiCall::ActivitySplits(activity_id)),
        "typed_splits" => Some(ApiCall::ActivityTypedSplits(activity_id)),
        "split_summaries" => Some(ApiCall::ActivitySplitSummaries(activity_id)),
        "weather" => Some(ApiCall::ActivityWeather(activity_id)),
        "hr_zones" => Some(ApiCall::ActivityHrZones(activity_id)),
        "gear" => Some(ApiCall::ActivityGear(activity_id)),
        "exercise_sets" => Some(ApiCall::ActivityExerciseSets(activity_id)),
        _ => None,
    }
}

/// Tool for fetching one activity with optional detail sections.
pub struct GetActivityDetailsTool;

#[async_trait]
impl McpTool for GetActivityDetailsTool {
    fn name(&self) -> &'static str {
        "get_activity_details"
    }

    fn description(&self) -> &'static str {
        "Get one activity with optional sections: splits, typed_splits, split_summaries, \
         weather, hr_zones, gear, exercise_sets (or 'all')"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "activity_id".to_owned(),
            PropertySchema::new("integer", "Garmin activity id"),
        );
        properties.insert(
            "sections".to_owned(),
            PropertySchema::new(
                "string",
                "Comma-separated detail sections, or 'all'. Default: none",
            ),
        );
        properties.insert(
            "unit".to_owned(),
            PropertySchema::one_of("Unit system", &["metric", "imperial"]),
        );
        JsonSchema::object(properties).with_required(&["activity_id"])
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let activity_id = required_u64(&args, "activity_id")?;
        let unit = unit_system(&args, &ctx.config)?;

        let requested = string_list(&args, "sections").unwrap_or_default();
        let sections: Vec<&str> = if requested.iter().any(|s| s == "all") {
            SECTIONS.to_vec()
        } else {
            let unknown: Vec<&str> = requested
                .iter()
                .map(String::as_str)
                .filter(|s| !SECTIONS.contains(s))
                .collect();
            if !unknown.is_empty() {
                return Err(unsupported(
                    &format!("Unknown sections: {}", unknown.join(", ")),
                    &["Valid sections: splits, typed_splits, split_summaries, weather, hr_zones, gear, exercise_sets, all"],
                ));
            }
            SECTIONS
                .iter()
                .copied()
                .filter(|s| requested.iter().any(|r| r == s))
                .collect()
        };

        let activity = ctx.call(ApiCall::Activity(activity_id)).await?;
        let mut data = Map::new();
        data.insert("activity".to_owned(), format_activity(&activity, unit));
        data.insert("training_effect".to_owned(), training_effect(&activity));
        for section in &sections {
            if let Some(call) = section_call(section, activity_id) {
                let value = ctx.call_optional(self.name(), section, call).await;
                data.insert((*section).to_owned(), value);
            }
        }

        Ok(ctx.render(
            ResponseEnvelope::new(Value::Object(data))
                .with_metadata("activity_id", activity_id)
                .with_metadata("sections", sections)
                .with_metadata("unit", unit.as_str()),
        ))
    }
}

// ============================================================================
// Tool factory
// ============================================================================

/// Create all activity tools for registration
#[must_use]
pub fn create_activity_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(QueryActivitiesTool),
        Box::new(GetActivityDetailsTool),
    ]
}
