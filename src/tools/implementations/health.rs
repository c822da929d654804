// ABOUTME: Daily wellness tools: per-day health metrics, step counts, and women's health views
// ABOUTME: Range queries page over calendar days and carry the range and metric list in the cursor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Health Tools
//!
//! `get_daily_health` fetches one API call per metric per day, so ranges are
//! paginated over days rather than fetched in one go. Each metric is optional:
//! a failed fetch shows up as `null` for that metric and day. The six core
//! metrics are fetched by default; the rest are opt-in or come with `all`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use garmin_core::envelope::ResponseEnvelope;
use garmin_core::pagination::{paginate, CursorFilters, FilterValue, PageRequest};
use garmin_providers::ApiCall;
use serde_json::{json, Map, Value};

use crate::errors::AppResult;
use crate::intelligence::wellness::{
    daily_health_insights, step_insights, summarize_all_day_events, summarize_body_battery,
    summarize_body_battery_events, summarize_daily_summary, summarize_floors,
    summarize_heart_rate, summarize_hrv, summarize_hydration, summarize_resting_heart_rate,
    summarize_respiration, summarize_sleep, summarize_spo2, summarize_stress,
};
use crate::intelligence::StepDay;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::paging::{
    day_limit, day_range_page, first_page, insert_range, range_filter, resume_day_page,
    text_filter, window_vec,
};
use crate::tools::params::{
    cursor, date_or_today, optional_str, string_list, time_range, time_range_or, unsupported,
};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

/// Metric names accepted by `get_daily_health`, in output order
pub const HEALTH_METRICS: [&str; 13] = [
    "summary",
    "sleep",
    "stress",
    "heart_rate",
    "body_battery",
    "hrv",
    "respiration",
    "spo2",
    "hydration",
    "floors",
    "resting_heart_rate",
    "body_battery_events",
    "all_day_events",
];

/// Metrics fetched when the caller names none
pub const DEFAULT_HEALTH_METRICS: [&str; 6] = [
    "summary",
    "sleep",
    "stress",
    "heart_rate",
    "body_battery",
    "hrv",
];

const METRICS_FILTER: &str = "metrics";

fn range_properties(properties: &mut HashMap<String, PropertySchema>) {
    properties.insert(
        "period".to_owned(),
        PropertySchema::new("string", "Period, e.g. '7d', 'this-week', 'last-month'"),
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
        "limit".to_owned(),
        PropertySchema::new("integer", "Days per page (1-31). Default: 7"),
    );
    properties.insert(
        "cursor".to_owned(),
        PropertySchema::new("string", "Cursor from a previous page"),
    );
}

fn metric_call(metric: &str, date: NaiveDate) -> Option<ApiCall> {
    match metric {
        "summary" => Some(ApiCall::UserSummary(date)),
        "sleep" => Some(ApiCall::SleepData(date)),
        "stress" => Some(ApiCall::StressData(date)),
        "heart_rate" => Some(ApiCall::HeartRates(date)),
        "body_battery" => Some(ApiCall::BodyBattery {
            start: date,
            end: date,
        }),
        "hrv" => Some(ApiCall::HrvData(date)),
        "respiration" => Some(ApiCall::Respiration(date)),
        "spo2" => Some(ApiCall::Spo2(date)),
        "hydration" => Some(ApiCall::Hydration(date)),
        "floors" => Some(ApiCall::Floors(date)),
        "resting_heart_rate" => Some(ApiCall::RestingHeartRate(date)),
        "body_battery_events" => Some(ApiCall::BodyBatteryEvents(date)),
        "all_day_events" => Some(ApiCall::AllDayEvents(date)),
        _ => None,
    }
}

fn summarize_metric(metric: &str, raw: &Value) -> Value {
    match metric {
        "summary" => summarize_daily_summary(raw),
        "sleep" => summarize_sleep(raw),
        "stress" => summarize_stress(raw),
        "heart_rate" => summarize_heart_rate(raw),
        "body_battery" => summarize_body_battery(raw),
        "hrv" => summarize_hrv(raw),
        "respiration" => summarize_respiration(raw),
        "spo2" => summarize_spo2(raw),
        "hydration" => summarize_hydration(raw),
        "floors" => summarize_floors(raw),
        "resting_heart_rate" => summarize_resting_heart_rate(raw),
        "body_battery_events" => summarize_body_battery_events(raw),
        "all_day_events" => summarize_all_day_events(raw),
        _ => Value::Null,
    }
}

// ============================================================================
// GetDailyHealthTool
// ============================================================================

/// Tool for per-day wellness metrics: the daily summary, sleep, stress, and more.
pub struct GetDailyHealthTool;

impl GetDailyHealthTool {
    /// Metric list from arguments, validated
    fn requested_metrics(args: &Value) -> AppResult<Vec<&'static str>> {
        let Some(requested) = string_list(args, "metrics") else {
            return Ok(DEFAULT_HEALTH_METRICS.to_vec());
        };
        if requested.iter().any(|m| m == "all") {
            return Ok(HEALTH_METRICS.to_vec());
        }
        let unknown: Vec<&str> = requested
            .iter()
            .map(String::as_str)
            .filter(|m| !HEALTH_METRICS.contains(m))
            .collect();
        if !unknown.is_empty() {
            return Err(unsupported(
                &format!("Unknown metrics: {}", unknown.join(", ")),
                &[
                    "Valid metrics: summary, sleep, stress, heart_rate, body_battery, hrv, \
                     respiration, spo2, hydration, floors, resting_heart_rate, \
                     body_battery_events, all_day_events, all",
                ],
            ));
        }
        let metrics: Vec<&'static str> = HEALTH_METRICS
            .iter()
            .copied()
            .filter(|m| requested.iter().any(|r| r == m))
            .collect();
        if metrics.is_empty() {
            return Ok(DEFAULT_HEALTH_METRICS.to_vec());
        }
        Ok(metrics)
    }

    /// Metrics recorded in a cursor
    fn cursor_metrics(request: &PageRequest) -> Vec<&'static str> {
        let Some(stored) = text_filter(request, METRICS_FILTER) else {
            return DEFAULT_HEALTH_METRICS.to_vec();
        };
        HEALTH_METRICS
            .iter()
            .copied()
            .filter(|m| stored.split(',').any(|s| s == *m))
            .collect()
    }

    async fn fetch_day(
        &self,
        ctx: &ToolExecutionContext,
        date: NaiveDate,
        metrics: &[&str],
    ) -> Value {
        let mut day = Map::new();
        day.insert("date".to_owned(), json!(date.to_string()));
        for metric in metrics {
            let Some(call) = metric_call(metric, date) else {
                continue;
            };
            let raw = ctx.call_optional(self.name(), metric, call).await;
            day.insert((*metric).to_owned(), summarize_metric(metric, &raw));
        }
        Value::Object(day)
    }
}

#[async_trait]
impl McpTool for GetDailyHealthTool {
    fn name(&self) -> &'static str {
        "get_daily_health"
    }

    fn description(&self) -> &'static str {
        "Daily health metrics for one date or a period. Default: summary, sleep, stress, \
         heart_rate, body_battery, hrv. Also available: respiration, spo2, hydration, floors, \
         resting_heart_rate, body_battery_events, all_day_events. Periods are paginated by day."
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "date".to_owned(),
            PropertySchema::new("string", "Single day: 'today', 'yesterday' or YYYY-MM-DD. Default: today"),
        );
        properties.insert(
            "metrics".to_owned(),
            PropertySchema::new(
                "string",
                "Comma-separated metric names, or 'all'. Default: the six core metrics",
            ),
        );
        range_properties(&mut properties);
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let today = ctx.today();
        // a single date takes precedence over a range
        let requested_range = if optional_str(&args, "date").is_some() {
            None
        } else {
            time_range(&args, today)?
        };

        let (request, range, metrics) = if let Some(page) = cursor(&args)? {
            let request = resume_day_page(page, day_limit(&args)?);
            let range = range_filter(&request)?;
            let metrics = Self::cursor_metrics(&request);
            (request, range, metrics)
        } else if let Some(range) = requested_range {
            let metrics = Self::requested_metrics(&args)?;
            let mut filters = CursorFilters::new();
            insert_range(&mut filters, &range);
            filters.insert(METRICS_FILTER.to_owned(), FilterValue::from(metrics.join(",")));
            (first_page(day_limit(&args)?, filters), range, metrics)
        } else {
            let date = date_or_today(&args, today)?;
            let metrics = Self::requested_metrics(&args)?;
            let day = self.fetch_day(ctx, date, &metrics).await;
            let insights = daily_health_insights(&day);
            return Ok(ctx.render(
                ResponseEnvelope::new(day)
                    .with_insights(insights)
                    .with_metadata("date", date.to_string())
                    .with_metadata("metrics", metrics),
            ));
        };

        let dates = range.newest_dates(request.offset(), request.fetch_size());
        let page = paginate(dates, &request)?;
        let mut days = Vec::with_capacity(page.items.len());
        let mut insights = Vec::new();
        for date in &page.items {
            let day = self.fetch_day(ctx, *date, &metrics).await;
            insights.extend(daily_health_insights(&day));
            days.push(day);
        }

        Ok(ctx.render(
            ResponseEnvelope::new(json!({"days": days, "count": days.len()}))
                .with_insights(insights)
                .with_pagination(page.pagination)
                .with_metadata("period", range.description.clone())
                .with_metadata("start_date", range.start_str())
                .with_metadata("end_date", range.end_str())
                .with_metadata("metrics", metrics),
        ))
    }
}

// ============================================================================
// GetDailyStepsTool
// ============================================================================

/// Tool for step counts per day over a period.
pub struct GetDailyStepsTool;

#[async_trait]
impl McpTool for GetDailyStepsTool {
    fn name(&self) -> &'static str {
        "get_daily_steps"
    }

    fn description(&self) -> &'static str {
        "Steps per day over a period with totals, averages, and goal achievement. Default period: 7d"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        range_properties(&mut properties);
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let (request, range) = day_range_page(&args, ctx.today(), "7d")?;
        let raw = ctx
            .call(ApiCall::DailySteps {
                start: range.start,
                end: range.end,
            })
            .await?;

        let mut days: Vec<StepDay> = raw
            .as_array()
            .map(|entries| entries.iter().map(StepDay::from_json).collect())
            .unwrap_or_default();
        days.sort_by(|a, b| b.date.cmp(&a.date));
        let insights = step_insights(&days);

        let page = paginate(window_vec(&request, &days), &request)?;
        let entries: Vec<Value> = page.items.iter().map(StepDay::to_json).collect();

        Ok(ctx.render(
            ResponseEnvelope::new(json!({"days": entries, "count": entries.len()}))
                .with_insights(insights)
                .with_pagination(page.pagination)
                .with_metadata("period", range.description.clone())
                .with_metadata("start_date", range.start_str())
                .with_metadata("end_date", range.end_str()),
        ))
    }
}

// ============================================================================
// GetWomensHealthTool
// ============================================================================

const WOMENS_HEALTH_VIEWS: [&str; 3] = ["day", "calendar", "pregnancy"];

/// Tool for menstrual cycle and pregnancy tracking data.
pub struct GetWomensHealthTool;

#[async_trait]
impl McpTool for GetWomensHealthTool {
    fn name(&self) -> &'static str {
        "get_womens_health"
    }

    fn description(&self) -> &'static str {
        "Menstrual cycle day view for a date, cycle calendar over a period (default 90d), \
         or the pregnancy summary"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "view".to_owned(),
            PropertySchema::one_of("What to fetch. Default: day", &WOMENS_HEALTH_VIEWS),
        );
        properties.insert(
            "date".to_owned(),
            PropertySchema::new("string", "Day for the 'day' view: 'today', 'yesterday' or YYYY-MM-DD"),
        );
        properties.insert(
            "period".to_owned(),
            PropertySchema::new("string", "Period for the 'calendar' view, e.g. '90d', 'ytd'"),
        );
        properties.insert(
            "start_date".to_owned(),
            PropertySchema::new("string", "Calendar range start (YYYY-MM-DD), used with end_date"),
        );
        properties.insert(
            "end_date".to_owned(),
            PropertySchema::new("string", "Calendar range end (YYYY-MM-DD), used with start_date"),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let today = ctx.today();
        let view = optional_str(&args, "view").unwrap_or("day").to_lowercase();

        let envelope = match view.as_str() {
            "day" => {
                let date = date_or_today(&args, today)?;
                let raw = ctx.call(ApiCall::MenstrualDay(date)).await?;
                let insights = if raw.is_null() {
                    vec![format!("No cycle data recorded for {date}")]
                } else {
                    Vec::new()
                };
                ResponseEnvelope::new(json!({"day": raw}))
                    .with_insights(insights)
                    .with_metadata("date", date.to_string())
            }
            "calendar" => {
                let range = time_range_or(&args, today, "90d")?;
                let raw = ctx
                    .call(ApiCall::MenstrualCalendar {
                        start: range.start,
                        end: range.end,
                    })
                    .await?;
                let cycles = raw
                    .get("cycleSummaries")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                ResponseEnvelope::new(json!({"calendar": raw}))
                    .with_insights(vec![format!("{cycles} cycles in {}", range.description)])
                    .with_metadata("period", range.description.clone())
                    .with_metadata("start_date", range.start_str())
                    .with_metadata("end_date", range.end_str())
            }
            "pregnancy" => {
                let raw = ctx.call(ApiCall::PregnancySummary).await?;
                let insights = if raw.is_null() {
                    vec!["No pregnancy is being tracked".to_owned()]
                } else {
                    Vec::new()
                };
                ResponseEnvelope::new(json!({"pregnancy": raw})).with_insights(insights)
            }
            other => {
                return Err(unsupported(
                    &format!("Unknown view '{other}'"),
                    &["Valid views: day, calendar, pregnancy"],
                ));
            }
        };

        Ok(ctx.render(envelope.with_metadata("view", view)))
    }
}

// ============================================================================
// Tool factory
// ============================================================================

/// Create all health tools for registration
#[must_use]
pub fn create_health_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(GetDailyHealthTool),
        Box::new(GetDailyStepsTool),
        Box::new(GetWomensHealthTool),
    ]
}
