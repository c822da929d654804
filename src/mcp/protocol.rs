// ABOUTME: MCP protocol message handlers for core protocol operations
// ABOUTME: Dispatches initialize, ping, tools, resources and prompts methods to JSON-RPC responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # MCP Protocol Handlers
//!
//! Maps one JSON-RPC message to at most one response. Protocol-level
//! problems (bad JSON, unknown method, unknown tool, bad params) are
//! JSON-RPC errors; tool failures are successful `tools/call` results whose
//! content is an error envelope with `isError: true`.

use std::collections::HashMap;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::constants::methods;
use crate::constants::protocol::{JSONRPC_VERSION, MCP_PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
use crate::jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse};
use crate::logging::AppLogger;
use crate::mcp::prompts::PromptArgs;
use crate::mcp::resources::ServerResources;
use crate::mcp::schema::{InitializeResponse, ToolCall, ToolResponse};

/// `resources/read` parameters
#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

/// `prompts/get` parameters
#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: HashMap<String, Value>,
}

/// MCP protocol handlers
pub struct ProtocolHandler;

impl ProtocolHandler {
    /// Parse one transport line and handle it
    ///
    /// Unparsable JSON yields a `-32700` response with a null id; JSON that is
    /// not a request yields `-32600`.
    pub async fn handle_message(line: &str, resources: &ServerResources) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparsable JSON-RPC message: {e}");
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => Self::handle_request(request, resources).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    /// Handle a decoded request; `None` for notifications
    pub async fn handle_request(
        request: JsonRpcRequest,
        resources: &ServerResources,
    ) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version: {}", request.jsonrpc),
            ));
        }

        if request.is_notification() {
            debug!(mcp.method = %request.method, "Notification received");
            return None;
        }

        let started = Instant::now();
        let method = request.method.clone();
        let response = match method.as_str() {
            methods::INITIALIZE => Self::handle_initialize(request),
            methods::PING => Self::handle_ping(request),
            methods::TOOLS_LIST => Self::handle_tools_list(request, resources),
            methods::TOOLS_CALL => Self::handle_tools_call(request, resources).await,
            methods::RESOURCES_LIST => Self::handle_resources_list(request, resources),
            methods::RESOURCES_READ => Self::handle_resources_read(request, resources).await,
            methods::PROMPTS_LIST => Self::handle_prompts_list(request, resources),
            methods::PROMPTS_GET => Self::handle_prompts_get(request, resources),
            _ => Self::handle_unknown_method(request),
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_mcp_request(&method, response.is_success(), duration_ms);
        Some(response)
    }

    /// Handle initialize request
    pub fn handle_initialize(request: JsonRpcRequest) -> JsonRpcResponse {
        let init_response = InitializeResponse::new(
            MCP_PROTOCOL_VERSION.to_owned(),
            SERVER_NAME.to_owned(),
            SERVER_VERSION.to_owned(),
        );
        respond(request.id, &init_response)
    }

    /// Handle ping request
    pub fn handle_ping(request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id, json!({}))
    }

    /// Handle tools list request
    pub fn handle_tools_list(request: JsonRpcRequest, resources: &ServerResources) -> JsonRpcResponse {
        respond(request.id, &json!({ "tools": resources.tools.list_schemas() }))
    }

    /// Handle tools call request
    pub async fn handle_tools_call(
        request: JsonRpcRequest,
        resources: &ServerResources,
    ) -> JsonRpcResponse {
        let call: ToolCall = match parse_params(request.params) {
            Ok(call) => call,
            Err(message) => {
                return JsonRpcResponse::error(request.id, error_codes::INVALID_PARAMS, message)
            }
        };

        let arguments = call.arguments.unwrap_or_else(|| json!({}));
        match resources
            .tools
            .execute(&call.name, arguments, &resources.context)
            .await
        {
            Ok(result) => respond(request.id, &ToolResponse::from(result)),
            Err(e) => JsonRpcResponse::error(request.id, error_codes::INVALID_PARAMS, e.to_string()),
        }
    }

    /// Handle resources list request
    pub fn handle_resources_list(
        request: JsonRpcRequest,
        resources: &ServerResources,
    ) -> JsonRpcResponse {
        respond(request.id, &json!({ "resources": resources.resources.list() }))
    }

    /// Handle resources read request
    pub async fn handle_resources_read(
        request: JsonRpcRequest,
        resources: &ServerResources,
    ) -> JsonRpcResponse {
        let params: ReadResourceParams = match parse_params(request.params) {
            Ok(params) => params,
            Err(message) => {
                return JsonRpcResponse::error(request.id, error_codes::INVALID_PARAMS, message)
            }
        };

        let Some(resource) = resources.resources.get(&params.uri) else {
            return JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_PARAMS,
                format!("Unknown resource: {}", params.uri),
            );
        };

        match resource.read(&resources.tools, &resources.context).await {
            Ok(contents) => respond(request.id, &json!({ "contents": [contents] })),
            Err(e) => JsonRpcResponse::error(request.id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    /// Handle prompts list request
    pub fn handle_prompts_list(
        request: JsonRpcRequest,
        resources: &ServerResources,
    ) -> JsonRpcResponse {
        respond(request.id, &json!({ "prompts": resources.prompts.list() }))
    }

    /// Handle prompts get request
    pub fn handle_prompts_get(request: JsonRpcRequest, resources: &ServerResources) -> JsonRpcResponse {
        let params: GetPromptParams = match parse_params(request.params) {
            Ok(params) => params,
            Err(message) => {
                return JsonRpcResponse::error(request.id, error_codes::INVALID_PARAMS, message)
            }
        };

        let Some(prompt) = resources.prompts.get(&params.name) else {
            return JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_PARAMS,
                format!("Unknown prompt: {}", params.name),
            );
        };

        let args: PromptArgs = params
            .arguments
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Null => None,
                Value::String(text) => Some((name, text)),
                other => Some((name, other.to_string())),
            })
            .collect();

        match prompt.get(&args, resources.context.today()) {
            Ok(result) => respond(request.id, &result),
            Err(e) => JsonRpcResponse::error(request.id, error_codes::INVALID_PARAMS, e.to_string()),
        }
    }

    /// Handle unknown method
    pub fn handle_unknown_method(request: JsonRpcRequest) -> JsonRpcResponse {
        warn!("Unknown MCP method: {}", request.method);
        JsonRpcResponse::error(
            request.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown method: {}", request.method),
        )
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    let params = params.ok_or_else(|| "Missing params".to_owned())?;
    serde_json::from_value(params).map_err(|e| format!("Invalid params: {e}"))
}

fn respond<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {e}"),
        ),
    }
}
