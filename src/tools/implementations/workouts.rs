// ABOUTME: Saved workouts: one workout by id with its steps, or a listing paginated by offset
// ABOUTME: Listing fetches limit + 1 workouts per page to detect whether more exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use async_trait::async_trait;
use garmin_core::envelope::ResponseEnvelope;
use garmin_core::pagination::{paginate, CursorFilters};
use garmin_core::units::format_duration;
use garmin_providers::ApiCall;
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::intelligence::activity::number;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::paging::{first_page, resume_page};
use crate::tools::params::{cursor, optional_u64, page_limit};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

use super::into_list;

fn summarize_workout(raw: &Value) -> Value {
    let duration = number(raw, "estimatedDurationInSecs");
    json!({
        "workout_id": raw.get("workoutId"),
        "name": raw.get("workoutName"),
        "sport": raw.pointer("/sportType/sportTypeKey"),
        "description": raw.get("description"),
        "estimated_duration": duration.map(|secs| format_duration(Some(secs))),
        "created": raw.get("createdDate"),
        "updated": raw.get("updatedDate"),
    })
}

/// Steps of every segment, flattened; repeat groups list their child steps
fn workout_steps(raw: &Value) -> Vec<Value> {
    fn collect(steps: &[Value], out: &mut Vec<Value>) {
        for step in steps {
            if let Some(children) = step.get("workoutSteps").and_then(Value::as_array) {
                collect(children, out);
                continue;
            }
            out.push(json!({
                "order": step.get("stepOrder"),
                "type": step.pointer("/stepType/stepTypeKey"),
                "end_condition": step.pointer("/endCondition/conditionTypeKey"),
                "end_condition_value": step.get("endConditionValue"),
                "target": step.pointer("/targetType/workoutTargetTypeKey"),
                "description": step.get("description"),
            }));
        }
    }

    let mut out = Vec::new();
    for segment in raw
        .get("workoutSegments")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        if let Some(steps) = segment.get("workoutSteps").and_then(Value::as_array) {
            collect(steps, &mut out);
        }
    }
    out
}

/// Tool for saved workouts.
pub struct GetWorkoutsTool;

#[async_trait]
impl McpTool for GetWorkoutsTool {
    fn name(&self) -> &'static str {
        "get_workouts"
    }

    fn description(&self) -> &'static str {
        "List saved workouts, newest first, or fetch one by workout_id with its steps. \
         Paginated: pass pagination.cursor back as `cursor`."
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "workout_id".to_owned(),
            PropertySchema::new("integer", "Return this single workout with its steps"),
        );
        properties.insert(
            "limit".to_owned(),
            PropertySchema::new("integer", "Workouts per page"),
        );
        properties.insert(
            "cursor".to_owned(),
            PropertySchema::new("string", "Cursor from a previous page"),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        if let Some(workout_id) = optional_u64(&args, "workout_id")? {
            let raw = ctx.call(ApiCall::Workout(workout_id)).await?;
            let steps = workout_steps(&raw);
            let step_count = steps.len();
            return Ok(ctx.render(
                ResponseEnvelope::new(json!({
                    "workout": summarize_workout(&raw),
                    "steps": steps,
                    "step_count": step_count,
                }))
                .with_metadata("query_type", "by_id")
                .with_metadata("workout_id", workout_id),
            ));
        }

        let limit = page_limit(&args, &ctx.config)?;
        let request = match cursor(&args)? {
            Some(page) => resume_page(page, limit, &ctx.config),
            None => first_page(limit, CursorFilters::new()),
        };

        let fetched = into_list(
            ctx.call(ApiCall::Workouts {
                start: request.offset(),
                limit: request.fetch_size(),
            })
            .await?,
        );
        let page = paginate(fetched, &request)?;
        let workouts: Vec<Value> = page.items.iter().map(summarize_workout).collect();

        Ok(ctx.render(
            ResponseEnvelope::new(json!({"workouts": workouts, "count": workouts.len()}))
                .with_pagination(page.pagination)
                .with_metadata("query_type", "list")
                .with_metadata("page", request.page),
        ))
    }
}

/// Create all workout tools for registration
#[must_use]
pub fn create_workout_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(GetWorkoutsTool)]
}
