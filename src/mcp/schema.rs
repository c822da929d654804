// ABOUTME: MCP protocol schema definitions and message structures
// ABOUTME: Tool, resource, prompt, and initialize payloads serialized for JSON-RPC results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! MCP Protocol Schema Definitions
//!
//! Type-safe definitions for the MCP payloads this server produces, so
//! handlers never hand-assemble protocol JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// MCP Tool Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// Description shown to the model
    pub description: String,
    /// Argument schema
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Always `object` for tool arguments
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Named properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    /// Required property names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl JsonSchema {
    /// Object schema with the given properties and no required fields
    #[must_use]
    pub fn object(properties: HashMap<String, PropertySchema>) -> Self {
        Self {
            schema_type: "object".to_owned(),
            properties: if properties.is_empty() {
                None
            } else {
                Some(properties)
            },
            required: None,
        }
    }

    /// Mark properties as required
    #[must_use]
    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required = Some(names.iter().map(|name| (*name).to_owned()).collect());
        self
    }
}

/// JSON Schema Property Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name
    #[serde(rename = "type")]
    pub property_type: String,
    /// What the property means
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values for string enums
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl PropertySchema {
    /// Property of `property_type` with a description
    #[must_use]
    pub fn new(property_type: &str, description: &str) -> Self {
        Self {
            property_type: property_type.to_owned(),
            description: Some(description.to_owned()),
            enum_values: None,
        }
    }

    /// String property restricted to `values`
    #[must_use]
    pub fn one_of(description: &str, values: &[&str]) -> Self {
        Self {
            property_type: "string".to_owned(),
            description: Some(description.to_owned()),
            enum_values: Some(values.iter().map(|v| (*v).to_owned()).collect()),
        }
    }
}

/// Tool Call for executing a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name
    pub name: String,
    /// Arguments object
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Tool Response after execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Content blocks; tools return one text block holding the envelope
    pub content: Vec<Content>,
    /// Whether the envelope is an error envelope
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// Content types for MCP messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    /// Plain text
    #[serde(rename = "text")]
    Text {
        /// Text body
        text: String,
    },
}

/// Resource listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource URI
    pub uri: String,
    /// Short name
    pub name: String,
    /// What the resource contains
    pub description: String,
    /// Content type of `resources/read`
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// One block of `resources/read` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContents {
    /// Resource URI
    pub uri: String,
    /// Content type
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Body
    pub text: String,
}

/// Prompt listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDescriptor {
    /// Prompt name
    pub name: String,
    /// What the prompt asks for
    pub description: String,
    /// Accepted arguments
    pub arguments: Vec<PromptArgument>,
}

/// Prompt argument definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name
    pub name: String,
    /// What the argument controls
    pub description: String,
    /// Whether `prompts/get` must supply it
    pub required: bool,
}

/// One rendered prompt message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    /// `user` or `assistant`
    pub role: String,
    /// Message body
    pub content: Content,
}

/// `prompts/get` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResult {
    /// Prompt description
    pub description: String,
    /// Rendered messages
    pub messages: Vec<PromptMessage>,
}

/// MCP Server Capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Prompt support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<ListChangedCapability>,
    /// Resource support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapability>,
    /// Tool support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ListChangedCapability>,
}

/// Capability that can announce list changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChangedCapability {
    /// Whether list change notifications are sent
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Resources capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesCapability {
    /// Whether subscriptions are supported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,
    /// Whether list change notifications are sent
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Complete MCP Initialize Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    /// Negotiated protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server identity
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Supported features
    pub capabilities: ServerCapabilities,
    /// Usage hints for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResponse {
    /// Create a new initialize response with current server configuration
    #[must_use]
    pub fn new(protocol_version: String, server_name: String, server_version: String) -> Self {
        Self {
            protocol_version,
            server_info: ServerInfo {
                name: server_name,
                version: server_version,
            },
            capabilities: ServerCapabilities {
                prompts: Some(ListChangedCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                tools: Some(ListChangedCapability {
                    list_changed: Some(false),
                }),
            },
            instructions: Some(
                "Garmin Connect data as tools. Every tool returns a JSON envelope with \
                 `data`, optional `analysis` and `pagination`, and `metadata`; failures return \
                 `{\"error\": {...}}`. Periods accept `7d`, `this-week`, `last-month`, `ytd`, \
                 `YYYY-MM-DD` or `YYYY-MM-DD:YYYY-MM-DD`. When `pagination.has_more` is true, \
                 pass `pagination.cursor` back as `cursor` to fetch the next page."
                    .into(),
            ),
        }
    }
}
