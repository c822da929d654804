// ABOUTME: Central registry for MCP tools with capability-based filtering and execution.
// ABOUTME: Provides tool discovery, category grouping, and feature-flag-based registration.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Registry
//!
//! Central registry for MCP tools, providing:
//! - Tool registration and lookup
//! - Capability-based filtering
//! - Feature-flag-based conditional registration
//! - Schema generation for MCP tools/list responses
//!
//! Execution converts tool failures into error envelopes, so the protocol
//! layer only ever sees an unknown-tool error or a rendered result.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::logging::AppLogger;
use crate::mcp::schema::ToolSchema;

use super::context::ToolExecutionContext;
use super::errors::ToolError;
use super::result::ToolResult;
use super::traits::{McpTool, ToolCapabilities};

/// Central registry for MCP tools.
///
/// Built once at startup and then used immutably. Tools are `Arc`-wrapped
/// so the registry can be shared across async tasks.
///
/// # Example
///
/// ```
/// use garmin_mcp_server::tools::registry::ToolRegistry;
///
/// let mut registry = ToolRegistry::new();
/// registry.register_builtin_tools();
/// assert!(registry.contains("query_activities"));
/// ```
pub struct ToolRegistry {
    /// Registered tools by name
    tools: HashMap<String, Arc<dyn McpTool>>,
    /// Tool categories for organization
    categories: HashMap<String, Vec<String>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    ///
    /// # Returns
    ///
    /// `true` if the tool was registered, `false` if a tool with the same name exists
    pub fn register(&mut self, tool: Arc<dyn McpTool>) -> bool {
        let name = tool.name().to_owned();

        if self.tools.contains_key(&name) {
            warn!("Tool '{}' is already registered, skipping", name);
            return false;
        }

        debug!(
            "Registering tool '{}' with capabilities: {}",
            name,
            tool.capabilities().describe()
        );
        self.tools.insert(name, tool);
        true
    }

    /// Register a tool and categorize it
    pub fn register_with_category(&mut self, tool: Arc<dyn McpTool>, category: &str) {
        let name = tool.name().to_owned();
        if self.register(tool) {
            self.categories
                .entry(category.to_owned())
                .or_default()
                .push(name);
        }
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn McpTool>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tool names, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// List tool names in a specific category
    #[must_use]
    pub fn tools_in_category(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// List all categories
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Schemas for `tools/list`, sorted by name so listings are stable
    #[must_use]
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .map(|tool| ToolSchema {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema(),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Filter tools by capabilities
    #[must_use]
    pub fn filter_by_capabilities(&self, required: ToolCapabilities) -> Vec<&Arc<dyn McpTool>> {
        self.tools
            .values()
            .filter(|tool| tool.capabilities().contains(required))
            .collect()
    }

    /// Tool names grouped by category, plus the tools that derive analytics
    ///
    /// Reported by `--check-config` so a deployment can see which feature
    /// flags were compiled in.
    #[must_use]
    pub fn catalog(&self) -> Value {
        let categories: Map<String, Value> = self
            .categories()
            .into_iter()
            .map(|category| (category.to_owned(), json!(self.tools_in_category(category))))
            .collect();
        let mut analytics: Vec<&str> = self
            .filter_by_capabilities(ToolCapabilities::ANALYTICS)
            .into_iter()
            .map(|tool| tool.name())
            .collect();
        analytics.sort_unstable();

        json!({
            "tool_count": self.len(),
            "categories": categories,
            "analytics": analytics,
        })
    }

    /// Execute a tool by name
    ///
    /// Tool failures come back as `Ok` with an error envelope; only an
    /// unknown tool name is an `Err`.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::NotFound` if no tool has that name
    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        context: &ToolExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::not_found(name))?;

        let started = Instant::now();
        let result = match tool.execute(args, context).await {
            Ok(result) => result,
            Err(error) => {
                debug!(tool = %name, kind = %error.kind(), "Tool failed: {error}");
                ToolResult::from_error(&error)
            }
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_mcp_tool_call(name, !result.is_error, duration_ms);

        Ok(result)
    }

    /// Register all built-in tools based on feature flags
    ///
    /// This method is called at startup to register all tools that are
    /// enabled via Cargo feature flags.
    pub fn register_builtin_tools(&mut self) {
        info!("Registering built-in tools...");

        // Activity query tools
        #[cfg(feature = "tools-activities")]
        self.register_activity_tools();

        // Analysis tools
        #[cfg(feature = "tools-analysis")]
        self.register_analysis_tools();

        // Health and body composition tools
        #[cfg(feature = "tools-health")]
        self.register_health_tools();

        // Training, records and workout tools
        #[cfg(feature = "tools-training")]
        self.register_training_tools();

        // Profile, device and gear tools
        #[cfg(feature = "tools-profile")]
        self.register_profile_tools();

        info!("Registered {} built-in tools", self.len());
    }

    /// Register activity query tools
    #[cfg(feature = "tools-activities")]
    fn register_activity_tools(&mut self) {
        use super::implementations::activities::create_activity_tools;

        debug!(
            "Registering activity tools (registry has {} tools)",
            self.tools.len()
        );

        for tool in create_activity_tools() {
            self.register_with_category(Arc::from(tool), "activities");
        }

        info!(
            "Registered activity tools (registry now has {} tools)",
            self.tools.len()
        );
    }

    /// Register activity analysis tools
    #[cfg(feature = "tools-analysis")]
    fn register_analysis_tools(&mut self) {
        use super::implementations::analysis::create_analysis_tools;

        debug!(
            "Registering analysis tools (registry has {} tools)",
            self.tools.len()
        );

        for tool in create_analysis_tools() {
            self.register_with_category(Arc::from(tool), "analysis");
        }

        info!(
            "Registered analysis tools (registry now has {} tools)",
            self.tools.len()
        );
    }

    /// Register daily health and weigh-in tools
    #[cfg(feature = "tools-health")]
    fn register_health_tools(&mut self) {
        use super::implementations::body::create_body_tools;
        use super::implementations::health::create_health_tools;

        debug!(
            "Registering health tools (registry has {} tools)",
            self.tools.len()
        );

        for tool in create_health_tools() {
            self.register_with_category(Arc::from(tool), "health");
        }
        for tool in create_body_tools() {
            self.register_with_category(Arc::from(tool), "body");
        }

        info!(
            "Registered health tools (registry now has {} tools)",
            self.tools.len()
        );
    }

    /// Register training metric, record and workout tools
    #[cfg(feature = "tools-training")]
    fn register_training_tools(&mut self) {
        use super::implementations::records::create_record_tools;
        use super::implementations::training::create_training_tools;
        use super::implementations::workouts::create_workout_tools;

        debug!(
            "Registering training tools (registry has {} tools)",
            self.tools.len()
        );

        for tool in create_training_tools() {
            self.register_with_category(Arc::from(tool), "training");
        }
        for tool in create_record_tools() {
            self.register_with_category(Arc::from(tool), "records");
        }
        for tool in create_workout_tools() {
            self.register_with_category(Arc::from(tool), "workouts");
        }

        info!(
            "Registered training tools (registry now has {} tools)",
            self.tools.len()
        );
    }

    /// Register profile, device and gear tools
    #[cfg(feature = "tools-profile")]
    fn register_profile_tools(&mut self) {
        use super::implementations::profile::create_profile_tools;

        debug!(
            "Registering profile tools (registry has {} tools)",
            self.tools.len()
        );

        for tool in create_profile_tools() {
            self.register_with_category(Arc::from(tool), "profile");
        }

        info!(
            "Registered profile tools (registry now has {} tools)",
            self.tools.len()
        );
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.tool_names())
            .field("categories", &self.categories())
            .finish()
    }
}
