// ABOUTME: Defines ToolExecutionContext, the explicit bundle of collaborators every tool receives.
// ABOUTME: Holds the Garmin API handle, tool configuration, and clock; renders envelopes with the clock's time.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Execution Context
//!
//! Tools receive their collaborators explicitly instead of pulling a client
//! out of ambient request state. Swapping the API or the clock in tests is a
//! matter of building a different context.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use garmin_core::clock::Clock;
use garmin_core::envelope::ResponseEnvelope;
use garmin_providers::{ApiCall, FitnessApi};
use serde_json::Value;

use crate::config::ToolConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

use super::result::ToolResult;

/// Context provided to every tool execution.
#[derive(Clone)]
pub struct ToolExecutionContext {
    /// Garmin Connect access
    pub api: Arc<dyn FitnessApi>,
    /// Tool defaults and limits
    pub config: Arc<ToolConfig>,
    /// Source of "now" and "today"
    pub clock: Arc<dyn Clock>,
}

impl ToolExecutionContext {
    /// Create a context from its collaborators
    #[must_use]
    pub fn new(api: Arc<dyn FitnessApi>, config: Arc<ToolConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { api, config, clock }
    }

    /// Local calendar date used to resolve relative periods
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Invoke the API, converting provider failures into `AppError`
    ///
    /// # Errors
    ///
    /// Returns the converted provider error
    pub async fn call(&self, call: ApiCall) -> AppResult<Value> {
        self.api.invoke(call).await.map_err(AppError::from)
    }

    /// Invoke the API for data a tool can do without
    ///
    /// Failures are logged and reported as `null` so the rest of the
    /// response still renders.
    pub async fn call_optional(&self, tool: &str, section: &str, call: ApiCall) -> Value {
        match self.api.invoke(call).await {
            Ok(value) => value,
            Err(e) => {
                AppLogger::log_optional_fetch_failure(tool, section, &e.to_string());
                Value::Null
            }
        }
    }

    /// Render a success envelope stamped with the clock's current time
    #[must_use]
    pub fn render(&self, envelope: ResponseEnvelope) -> ToolResult {
        ToolResult::ok(envelope.render_at(self.clock.now()))
    }
}

impl fmt::Debug for ToolExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolExecutionContext")
            .field("provider", &self.api.provider_name())
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish()
    }
}
