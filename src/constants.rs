// ABOUTME: Server-level constants: protocol identity plus resource URIs and prompt names
// ABOUTME: Re-exports the core crate's limits and error kinds so callers import from one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Protocol identity, limits and error kinds live in `garmin_core`; this
//! module re-exports them next to the names only the MCP surface needs.

pub use garmin_core::constants::{error_kinds, limits, protocol, providers, units};

/// URIs served through `resources/list` and `resources/read`
pub mod resources {
    /// Compact user profile
    pub const PROFILE_URI: &str = "garmin://profile";
    /// Ten most recent activities as a response envelope
    pub const RECENT_ACTIVITIES_URI: &str = "garmin://activities/recent";
    /// Today's daily summary
    pub const HEALTH_TODAY_URI: &str = "garmin://health/today";
    /// Period grammar and pagination guide
    pub const PERIOD_GUIDE_URI: &str = "garmin://guide/periods";

    /// Activities included in the recent-activities resource
    pub const RECENT_ACTIVITY_COUNT: u32 = 10;

    /// MIME type of envelope resources
    pub const MIME_JSON: &str = "application/json";
    /// MIME type of the guide
    pub const MIME_MARKDOWN: &str = "text/markdown";
}

/// Prompt names served through `prompts/list` and `prompts/get`
pub mod prompts {
    /// Review of a training period
    pub const ANALYZE_RECENT_TRAINING: &str = "analyze_recent_training";
    /// Seven-day wellness report
    pub const WEEKLY_HEALTH_REPORT: &str = "weekly_health_report";
    /// Side-by-side comparison of the latest activities
    pub const COMPARE_RECENT_ACTIVITIES: &str = "compare_recent_activities";
    /// Training plan for the coming week
    pub const PLAN_NEXT_WEEK: &str = "plan_next_week";
}

/// JSON-RPC method names handled by the protocol layer
pub mod methods {
    /// Session handshake
    pub const INITIALIZE: &str = "initialize";
    /// Handshake acknowledgement (notification)
    pub const INITIALIZED: &str = "notifications/initialized";
    /// Liveness check
    pub const PING: &str = "ping";
    /// Tool listing
    pub const TOOLS_LIST: &str = "tools/list";
    /// Tool execution
    pub const TOOLS_CALL: &str = "tools/call";
    /// Resource listing
    pub const RESOURCES_LIST: &str = "resources/list";
    /// Resource read
    pub const RESOURCES_READ: &str = "resources/read";
    /// Prompt listing
    pub const PROMPTS_LIST: &str = "prompts/list";
    /// Prompt rendering
    pub const PROMPTS_GET: &str = "prompts/get";
}
