// ABOUTME: Registry of MCP resources: read-only views served through resources/list and resources/read
// ABOUTME: Data resources replay a registered tool with fixed arguments; the period guide is static text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Resource Registry
//!
//! Resources are fixed views over the tool layer. `garmin://activities/recent`
//! is exactly what `query_activities` returns for `{"limit": 10}`, so a
//! resource never drifts from the tool that backs it. A data resource is only
//! registered when its tool is, which keeps feature-gated builds consistent.

use std::fmt;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::constants::resources::{
    HEALTH_TODAY_URI, MIME_JSON, MIME_MARKDOWN, PERIOD_GUIDE_URI, PROFILE_URI,
    RECENT_ACTIVITIES_URI, RECENT_ACTIVITY_COUNT,
};
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::{ResourceContents, ResourceDescriptor};
use crate::tools::{ToolExecutionContext, ToolRegistry};

const PERIOD_GUIDE: &str = "\
# Periods and pagination

## Period expressions

Every tool that takes `period` accepts:

- `today`, `yesterday`
- `Nd` for the last N days including today, e.g. `7d`, `30d`
- `this-week`, `last-week` (weeks start on Monday)
- `this-month`, `last-month`
- `this-year`, `ytd`
- `YYYY-MM-DD` for a single day
- `YYYY-MM-DD:YYYY-MM-DD` for an inclusive range

Absolute ranges must not be reversed. `start_date` and `end_date` may be
passed instead of `period`.

## Pagination

Paginated tools return `pagination.has_more`. When it is true, call the same
tool again with only `cursor` set to `pagination.cursor`. The cursor carries
the original filters, so the other arguments do not need to be repeated.
Cursors are opaque; a modified cursor is rejected with `invalid_cursor`.
";

/// Where a resource's body comes from
#[derive(Debug, Clone)]
pub enum ResourceSource {
    /// Output of a registered tool called with fixed arguments
    Tool {
        /// Tool name
        name: &'static str,
        /// Arguments passed on every read
        arguments: Value,
    },
    /// Fixed text
    Static(&'static str),
}

/// One entry in the resource registry
#[derive(Debug, Clone)]
pub struct McpResource {
    /// Resource URI
    pub uri: &'static str,
    /// Short name
    pub name: &'static str,
    /// What the resource contains
    pub description: &'static str,
    /// Content type of the body
    pub mime_type: &'static str,
    /// Body source
    pub source: ResourceSource,
}

impl McpResource {
    /// Listing entry for `resources/list`
    #[must_use]
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            uri: self.uri.to_owned(),
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            mime_type: self.mime_type.to_owned(),
        }
    }

    /// Render the resource body
    ///
    /// A tool that fails still yields contents: its error envelope.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the backing tool is not registered
    pub async fn read(
        &self,
        tools: &ToolRegistry,
        context: &ToolExecutionContext,
    ) -> AppResult<ResourceContents> {
        let text = match &self.source {
            ResourceSource::Static(text) => (*text).to_owned(),
            ResourceSource::Tool { name, arguments } => {
                tools
                    .execute(name, arguments.clone(), context)
                    .await
                    .map_err(|e| AppError::internal(format!("Resource {}: {e}", self.uri)))?
                    .content
            }
        };
        Ok(ResourceContents {
            uri: self.uri.to_owned(),
            mime_type: self.mime_type.to_owned(),
            text,
        })
    }
}

/// Resources by URI, in registration order.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: Vec<McpResource>,
}

impl ResourceRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource
    ///
    /// # Returns
    ///
    /// `false` if the URI is already taken
    pub fn register(&mut self, resource: McpResource) -> bool {
        if self.get(resource.uri).is_some() {
            debug!("Resource '{}' is already registered, skipping", resource.uri);
            return false;
        }
        self.resources.push(resource);
        true
    }

    /// Look up a resource by URI
    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&McpResource> {
        self.resources.iter().find(|resource| resource.uri == uri)
    }

    /// Number of registered resources
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resources are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Listing for `resources/list`
    #[must_use]
    pub fn list(&self) -> Vec<ResourceDescriptor> {
        self.resources.iter().map(McpResource::descriptor).collect()
    }

    /// Register the built-in resources whose backing tools are available
    pub fn register_builtin_resources(&mut self, tools: &ToolRegistry) {
        let data_resources = [
            McpResource {
                uri: PROFILE_URI,
                name: "User profile",
                description: "Display name, full name and location of the Garmin Connect user",
                mime_type: MIME_JSON,
                source: ResourceSource::Tool {
                    name: "get_user_profile",
                    arguments: json!({}),
                },
            },
            McpResource {
                uri: RECENT_ACTIVITIES_URI,
                name: "Recent activities",
                description: "The ten most recent activities with formatted distance, pace and duration",
                mime_type: MIME_JSON,
                source: ResourceSource::Tool {
                    name: "query_activities",
                    arguments: json!({"limit": RECENT_ACTIVITY_COUNT}),
                },
            },
            McpResource {
                uri: HEALTH_TODAY_URI,
                name: "Today's health",
                description: "Today's daily summary: steps, calories, resting heart rate, stress",
                mime_type: MIME_JSON,
                source: ResourceSource::Tool {
                    name: "get_daily_health",
                    arguments: json!({"metrics": ["summary"]}),
                },
            },
        ];

        for resource in data_resources {
            if let ResourceSource::Tool { name, .. } = &resource.source {
                if !tools.contains(name) {
                    debug!("Skipping resource '{}': tool '{name}' not registered", resource.uri);
                    continue;
                }
            }
            self.register(resource);
        }

        self.register(McpResource {
            uri: PERIOD_GUIDE_URI,
            name: "Period and pagination guide",
            description: "Accepted period expressions and how to page through results with cursors",
            mime_type: MIME_MARKDOWN,
            source: ResourceSource::Static(PERIOD_GUIDE),
        });

        info!("Registered {} built-in resources", self.len());
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uris: Vec<&str> = self.resources.iter().map(|r| r.uri).collect();
        f.debug_struct("ResourceRegistry").field("uris", &uris).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_follow_registered_tools() {
        let mut resources = ResourceRegistry::new();
        resources.register_builtin_resources(&ToolRegistry::new());
        assert_eq!(resources.len(), 1);
        assert!(resources.get(PERIOD_GUIDE_URI).is_some());
        assert!(resources.get(PROFILE_URI).is_none());
    }

    #[test]
    fn test_duplicate_uri_rejected() {
        let mut resources = ResourceRegistry::new();
        let guide = McpResource {
            uri: PERIOD_GUIDE_URI,
            name: "guide",
            description: "guide",
            mime_type: MIME_MARKDOWN,
            source: ResourceSource::Static("text"),
        };
        assert!(resources.register(guide.clone()));
        assert!(!resources.register(guide));
    }
}
