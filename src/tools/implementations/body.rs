// ABOUTME: Body measurement tools: weigh-ins, blood pressure readings, and body composition
// ABOUTME: Each fetches the whole range once and pages locally over the entries Garmin returns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use async_trait::async_trait;
use garmin_core::envelope::ResponseEnvelope;
use garmin_core::pagination::paginate;
use garmin_providers::ApiCall;
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::intelligence::wellness::{
    blood_pressure_insights, body_composition_entries, summarize_body_composition, weight_insights,
};
use crate::intelligence::{BloodPressureReading, WeighIn};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::paging::{day_range_page, window_vec};
use crate::tools::params::unit_system;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

fn range_schema(default_period: &str, entries: &str, with_unit: bool) -> JsonSchema {
    let mut properties = HashMap::new();
    properties.insert(
        "period".to_owned(),
        PropertySchema::new(
            "string",
            &format!("Period, e.g. '30d', 'last-month', 'ytd'. Default: {default_period}"),
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
        "limit".to_owned(),
        PropertySchema::new("integer", &format!("{entries} per page (1-31). Default: 7")),
    );
    properties.insert(
        "cursor".to_owned(),
        PropertySchema::new("string", "Cursor from a previous page"),
    );
    if with_unit {
        properties.insert(
            "unit".to_owned(),
            PropertySchema::one_of("Unit system", &["metric", "imperial"]),
        );
    }
    JsonSchema::object(properties)
}

// ============================================================================
// QueryWeighInsTool
// ============================================================================

/// Tool for weigh-ins over a period.
pub struct QueryWeighInsTool;

#[async_trait]
impl McpTool for QueryWeighInsTool {
    fn name(&self) -> &'static str {
        "query_weigh_ins"
    }

    fn description(&self) -> &'static str {
        "Weigh-ins (weight, BMI, body fat) over a period with the overall change. Default period: 30d"
    }

    fn input_schema(&self) -> JsonSchema {
        range_schema("30d", "Weigh-ins", true)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let unit = unit_system(&args, &ctx.config)?;
        let (request, range) = day_range_page(&args, ctx.today(), "30d")?;

        let raw = ctx
            .call(ApiCall::WeighIns {
                start: range.start,
                end: range.end,
            })
            .await?;
        let mut weigh_ins = WeighIn::list_from_json(&raw);
        weigh_ins.sort_by(|a, b| b.date.cmp(&a.date));
        let insights = weight_insights(&weigh_ins, unit);

        let page = paginate(window_vec(&request, &weigh_ins), &request)?;
        let entries: Vec<Value> = page.items.iter().map(|w| w.to_json(unit)).collect();

        Ok(ctx.render(
            ResponseEnvelope::new(json!({"weigh_ins": entries, "count": entries.len()}))
                .with_insights(insights)
                .with_pagination(page.pagination)
                .with_metadata("period", range.description.clone())
                .with_metadata("start_date", range.start_str())
                .with_metadata("end_date", range.end_str())
                .with_metadata("unit", unit.as_str()),
        ))
    }
}

// ============================================================================
// QueryBloodPressureTool
// ============================================================================

/// Tool for blood pressure readings over a period.
pub struct QueryBloodPressureTool;

#[async_trait]
impl McpTool for QueryBloodPressureTool {
    fn name(&self) -> &'static str {
        "query_blood_pressure"
    }

    fn description(&self) -> &'static str {
        "Blood pressure readings (systolic, diastolic, pulse) over a period, newest first, \
         with averages. Default period: 30d"
    }

    fn input_schema(&self) -> JsonSchema {
        range_schema("30d", "Readings", false)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let (request, range) = day_range_page(&args, ctx.today(), "30d")?;

        let raw = ctx
            .call(ApiCall::BloodPressure {
                start: range.start,
                end: range.end,
            })
            .await?;
        let readings = BloodPressureReading::list_from_json(&raw);
        let insights = blood_pressure_insights(&readings);

        let page = paginate(window_vec(&request, &readings), &request)?;
        let entries: Vec<Value> = page.items.iter().map(BloodPressureReading::to_json).collect();

        Ok(ctx.render(
            ResponseEnvelope::new(json!({"readings": entries, "count": entries.len()}))
                .with_insights(insights)
                .with_pagination(page.pagination)
                .with_metadata("period", range.description.clone())
                .with_metadata("start_date", range.start_str())
                .with_metadata("end_date", range.end_str()),
        ))
    }
}

// ============================================================================
// GetBodyCompositionTool
// ============================================================================

/// Tool for body composition entries and period averages.
pub struct GetBodyCompositionTool;

#[async_trait]
impl McpTool for GetBodyCompositionTool {
    fn name(&self) -> &'static str {
        "get_body_composition"
    }

    fn description(&self) -> &'static str {
        "Body composition (weight, BMI, body fat, body water, muscle and bone mass) over a period \
         with period averages. Default period: 30d"
    }

    fn input_schema(&self) -> JsonSchema {
        range_schema("30d", "Entries", true)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let unit = unit_system(&args, &ctx.config)?;
        let (request, range) = day_range_page(&args, ctx.today(), "30d")?;

        let raw = ctx
            .call(ApiCall::BodyComposition {
                start: range.start,
                end: range.end,
            })
            .await?;
        let entries = body_composition_entries(&raw);
        let averages = raw
            .get("totalAverage")
            .filter(|average| !average.is_null())
            .map_or(Value::Null, |average| {
                let mut summary = summarize_body_composition(average, unit);
                if let Value::Object(fields) = &mut summary {
                    fields.remove("date");
                }
                summary
            });
        let insights = if entries.is_empty() {
            vec!["No body composition entries in this period".to_owned()]
        } else {
            vec![format!("{} body composition entries", entries.len())]
        };

        let page = paginate(window_vec(&request, &entries), &request)?;
        let items: Vec<Value> = page
            .items
            .iter()
            .map(|entry| summarize_body_composition(entry, unit))
            .collect();

        Ok(ctx.render(
            ResponseEnvelope::new(json!({
                "entries": items,
                "count": items.len(),
                "averages": averages,
            }))
            .with_insights(insights)
            .with_pagination(page.pagination)
            .with_metadata("period", range.description.clone())
            .with_metadata("start_date", range.start_str())
            .with_metadata("end_date", range.end_str())
            .with_metadata("unit", unit.as_str()),
        ))
    }
}

/// Create all body measurement tools for registration
#[must_use]
pub fn create_body_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(QueryWeighInsTool),
        Box::new(QueryBloodPressureTool),
        Box::new(GetBodyCompositionTool),
    ]
}
