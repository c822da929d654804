// ABOUTME: Prompt templates served through prompts/list and prompts/get
// ABOUTME: Each prompt renders a single user message that steers the model toward specific tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use garmin_core::constants::limits::{MAX_COMPARE_ACTIVITIES, MIN_COMPARE_ACTIVITIES};
use garmin_core::time_range::parse_time_range;
use tracing::info;

use crate::constants::prompts::{
    ANALYZE_RECENT_TRAINING, COMPARE_RECENT_ACTIVITIES, PLAN_NEXT_WEEK, WEEKLY_HEALTH_REPORT,
};
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::{Content, PromptArgument, PromptDescriptor, PromptMessage, PromptResult};

/// Arguments supplied to `prompts/get`
pub type PromptArgs = HashMap<String, String>;

/// Renders a prompt body from its arguments and today's date
pub type PromptRenderer = fn(&PromptArgs, NaiveDate) -> AppResult<String>;

/// Declared prompt argument
#[derive(Debug, Clone, Copy)]
pub struct ArgumentSpec {
    /// Argument name
    pub name: &'static str,
    /// What the argument controls
    pub description: &'static str,
    /// Whether `prompts/get` must supply it
    pub required: bool,
}

/// A registered prompt template
#[derive(Clone)]
pub struct PromptTemplate {
    /// Prompt name
    pub name: &'static str,
    /// What the prompt asks for
    pub description: &'static str,
    /// Accepted arguments
    pub arguments: Vec<ArgumentSpec>,
    /// Body renderer
    pub render: PromptRenderer,
}

impl PromptTemplate {
    /// Listing entry for `prompts/list`
    #[must_use]
    pub fn descriptor(&self) -> PromptDescriptor {
        PromptDescriptor {
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            arguments: self
                .arguments
                .iter()
                .map(|arg| PromptArgument {
                    name: arg.name.to_owned(),
                    description: arg.description.to_owned(),
                    required: arg.required,
                })
                .collect(),
        }
    }

    /// Check required arguments and render the prompt
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when a required argument is missing or an
    /// argument value is unusable
    pub fn get(&self, args: &PromptArgs, today: NaiveDate) -> AppResult<PromptResult> {
        if let Some(missing) = self
            .arguments
            .iter()
            .find(|arg| arg.required && argument(args, arg.name).is_none())
        {
            return Err(AppError::invalid_argument(format!(
                "Prompt '{}' requires argument '{}'",
                self.name, missing.name
            )));
        }

        let text = (self.render)(args, today)?;
        Ok(PromptResult {
            description: self.description.to_owned(),
            messages: vec![PromptMessage {
                role: "user".to_owned(),
                content: Content::Text { text },
            }],
        })
    }
}

impl fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptTemplate")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Prompt templates by name, in registration order.
#[derive(Debug, Default)]
pub struct PromptRegistry {
    prompts: Vec<PromptTemplate>,
}

impl PromptRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prompt; `false` if the name is taken
    pub fn register(&mut self, prompt: PromptTemplate) -> bool {
        if self.get(prompt.name).is_some() {
            return false;
        }
        self.prompts.push(prompt);
        true
    }

    /// Look up a prompt by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        self.prompts.iter().find(|prompt| prompt.name == name)
    }

    /// Number of registered prompts
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether no prompts are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Listing for `prompts/list`
    #[must_use]
    pub fn list(&self) -> Vec<PromptDescriptor> {
        self.prompts.iter().map(PromptTemplate::descriptor).collect()
    }

    /// Register the built-in prompts
    pub fn register_builtin_prompts(&mut self) {
        self.register(PromptTemplate {
            name: ANALYZE_RECENT_TRAINING,
            description: "Review training volume, consistency and readiness over a period",
            arguments: vec![ArgumentSpec {
                name: "period",
                description: "Period expression such as '30d' or 'last-month'. Default: 30d",
                required: false,
            }],
            render: render_analyze_recent_training,
        });
        self.register(PromptTemplate {
            name: WEEKLY_HEALTH_REPORT,
            description: "Summarize the last seven days of sleep, stress, steps and recovery",
            arguments: Vec::new(),
            render: render_weekly_health_report,
        });
        self.register(PromptTemplate {
            name: COMPARE_RECENT_ACTIVITIES,
            description: "Compare the most recent activities of one type",
            arguments: vec![
                ArgumentSpec {
                    name: "activity_type",
                    description: "Activity type key such as 'running' or 'cycling'. Default: any",
                    required: false,
                },
                ArgumentSpec {
                    name: "count",
                    description: "How many activities to compare (2-5). Default: 3",
                    required: false,
                },
            ],
            render: render_compare_recent_activities,
        });
        self.register(PromptTemplate {
            name: PLAN_NEXT_WEEK,
            description: "Draft next week's training from recent load and readiness",
            arguments: vec![ArgumentSpec {
                name: "goal",
                description: "What the week should build toward, e.g. 'half marathon in May'",
                required: false,
            }],
            render: render_plan_next_week,
        });

        info!("Registered {} built-in prompts", self.len());
    }
}

fn argument<'a>(args: &'a PromptArgs, name: &str) -> Option<&'a str> {
    args.get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn render_analyze_recent_training(args: &PromptArgs, today: NaiveDate) -> AppResult<String> {
    let period = argument(args, "period").unwrap_or("30d");
    let range = parse_time_range(period, today)?;
    Ok(format!(
        "Analyze my training for {description} ({start} to {end}).\n\n\
         1. Call analyze_training_period with period=\"{period}\".\n\
         2. Call get_training_status for today.\n\n\
         Summarize total volume, how consistent the weeks were and which activity types \
         dominated. Point out anything unusual in the weekly trend and finish with two or \
         three concrete adjustments.",
        description = range.description,
        start = range.start_str(),
        end = range.end_str(),
    ))
}

fn render_weekly_health_report(_args: &PromptArgs, _today: NaiveDate) -> AppResult<String> {
    Ok("Write my weekly health report.\n\n\
        1. Call get_daily_health with period=\"7d\" and limit=7.\n\
        2. Call get_daily_steps with period=\"7d\".\n\
        3. Call get_training_status for today.\n\n\
        Cover sleep duration and quality, stress and body battery, and daily steps against \
        my goal. Call out the best and worst day and end with one habit to focus on next week."
        .to_owned())
}

fn render_compare_recent_activities(args: &PromptArgs, _today: NaiveDate) -> AppResult<String> {
    let count = match argument(args, "count") {
        None => 3,
        Some(text) => text
            .parse::<usize>()
            .ok()
            .filter(|n| (MIN_COMPARE_ACTIVITIES..=MAX_COMPARE_ACTIVITIES).contains(n))
            .ok_or_else(|| {
                AppError::invalid_argument(format!(
                    "count must be a number between {MIN_COMPARE_ACTIVITIES} and \
                     {MAX_COMPARE_ACTIVITIES}, got '{text}'"
                ))
            })?,
    };
    let query = argument(args, "activity_type").map_or_else(
        || format!("limit={count}"),
        |kind| format!("activity_type=\"{kind}\" and limit={count}"),
    );
    Ok(format!(
        "Compare my {count} most recent activities.\n\n\
         1. Call query_activities with {query}.\n\
         2. Pass their activity IDs to compare_activities.\n\n\
         Explain how distance, pace, elevation and heart rate differ between them and \
         whether the trend points to improving fitness."
    ))
}

fn render_plan_next_week(args: &PromptArgs, _today: NaiveDate) -> AppResult<String> {
    let goal = argument(args, "goal").map_or_else(
        || "Keep building general fitness.".to_owned(),
        |goal| format!("My goal: {goal}."),
    );
    Ok(format!(
        "Plan my training for next week. {goal}\n\n\
         1. Call analyze_training_period with period=\"28d\" to see recent load.\n\
         2. Call get_training_status for today for readiness.\n\
         3. Call get_race_predictions and get_goals for context.\n\n\
         Propose a day-by-day plan with session type, duration and intensity. Keep the \
         weekly volume within about ten percent of the recent average unless readiness is low."
    ))
}
