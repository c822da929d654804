// ABOUTME: Defines the McpTool trait and ToolCapabilities for the pluggable tools architecture.
// ABOUTME: Tools implement this trait to be registered and executed via the ToolRegistry.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # MCP Tool Trait and Capabilities
//!
//! All tools implement [`McpTool`], which provides:
//! - Tool metadata (name, description, input schema)
//! - Capability flags for filtering
//! - Async execution against an explicit [`ToolExecutionContext`]

use async_trait::async_trait;
use bitflags::bitflags;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;

use super::context::ToolExecutionContext;
use super::result::ToolResult;

bitflags! {
    /// Capabilities that tools can declare for filtering and discovery.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ToolCapabilities: u8 {
        /// Tool calls the Garmin Connect API
        const REQUIRES_PROVIDER = 0b0000_0001;
        /// Tool reads data (activities, health metrics, etc.)
        const READS_DATA = 0b0000_0010;
        /// Tool derives aggregates or comparisons from fetched data
        const ANALYTICS = 0b0000_0100;
    }
}

impl ToolCapabilities {
    /// Check if tool requires a connected provider
    #[must_use]
    pub const fn requires_provider(self) -> bool {
        self.contains(Self::REQUIRES_PROVIDER)
    }

    /// Check if tool reads data
    #[must_use]
    pub const fn reads_data(self) -> bool {
        self.contains(Self::READS_DATA)
    }

    /// Check if tool performs analytics
    #[must_use]
    pub const fn is_analytics(self) -> bool {
        self.contains(Self::ANALYTICS)
    }

    /// Get a description of all enabled capabilities for logging
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.requires_provider() {
            parts.push("requires_provider");
        }
        if self.reads_data() {
            parts.push("reads_data");
        }
        if self.is_analytics() {
            parts.push("analytics");
        }

        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

/// The main trait that all MCP tools must implement.
///
/// Tools are `Send + Sync` and stateless; everything a call needs arrives in
/// `args` or the context.
///
/// # Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use garmin_mcp_server::tools::{McpTool, ToolCapabilities, ToolResult, ToolExecutionContext};
/// use garmin_mcp_server::mcp::schema::JsonSchema;
/// use garmin_mcp_server::errors::AppResult;
/// use garmin_core::envelope::ResponseEnvelope;
/// use serde_json::{json, Value};
/// use std::collections::HashMap;
///
/// struct PingTool;
///
/// #[async_trait]
/// impl McpTool for PingTool {
///     fn name(&self) -> &'static str {
///         "ping_garmin"
///     }
///
///     fn description(&self) -> &'static str {
///         "Answer with an empty envelope"
///     }
///
///     fn input_schema(&self) -> JsonSchema {
///         JsonSchema::object(HashMap::new())
///     }
///
///     fn capabilities(&self) -> ToolCapabilities {
///         ToolCapabilities::empty()
///     }
///
///     async fn execute(&self, _args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
///         Ok(ctx.render(ResponseEnvelope::new(json!({}))))
///     }
/// }
/// ```
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Unique identifier used for lookup and in `tools/call`
    fn name(&self) -> &'static str;

    /// Human-readable description for LLM consumption
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> JsonSchema;

    /// Capability flags for filtering
    fn capabilities(&self) -> ToolCapabilities;

    /// Execute the tool with given arguments and context
    ///
    /// # Errors
    ///
    /// Returns `AppError` for invalid arguments or upstream failures; the
    /// registry renders it as an error envelope
    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult>;
}
