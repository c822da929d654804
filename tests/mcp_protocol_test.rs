// ABOUTME: Integration tests for JSON-RPC dispatch and the line-delimited transport
// ABOUTME: Drives initialize, tools, resources and prompts through ProtocolHandler and serve()
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{recent_runs, registry, server, MockFitnessApi};
use garmin_mcp_server::jsonrpc::{error_codes, JsonRpcResponse};
use garmin_mcp_server::mcp::protocol::ProtocolHandler;
use garmin_mcp_server::mcp::resources::ServerResources;
use garmin_mcp_server::mcp::transport::serve;
use serde_json::{json, Value};

async fn send(resources: &ServerResources, message: Value) -> Option<JsonRpcResponse> {
    ProtocolHandler::handle_message(&message.to_string(), resources).await
}

async fn result_of(resources: &ServerResources, message: Value) -> Value {
    let response = send(resources, message).await.expect("request gets a response");
    assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
    response.result.expect("success carries a result")
}

async fn error_code_of(resources: &ServerResources, message: Value) -> i32 {
    let response = send(resources, message).await.expect("request gets a response");
    assert!(response.result.is_none());
    response.error.expect("error response").code
}

fn request(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

#[tokio::test]
async fn test_initialize_reports_server_and_capabilities() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let result = result_of(&resources, request(1, "initialize", json!({}))).await;

    assert_eq!(result["protocolVersion"], "2025-06-18");
    assert_eq!(result["serverInfo"]["name"], "garmin-mcp-server");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
    assert!(result["capabilities"]["prompts"].is_object());
}

#[tokio::test]
async fn test_notification_gets_no_reply() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let reply = send(
        &resources,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_protocol_errors() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let unknown = error_code_of(&resources, request(2, "tools/destroy", json!({}))).await;
    assert_eq!(unknown, error_codes::METHOD_NOT_FOUND);

    let parse = ProtocolHandler::handle_message("{not json", &resources)
        .await
        .unwrap();
    assert_eq!(parse.error.unwrap().code, error_codes::PARSE_ERROR);
    assert!(parse.id.is_none());

    let version = error_code_of(
        &resources,
        json!({"jsonrpc": "1.0", "id": 3, "method": "ping"}),
    )
    .await;
    assert_eq!(version, error_codes::INVALID_REQUEST);

    let not_a_request = send(&resources, json!({"id": 4, "params": {}})).await.unwrap();
    assert_eq!(not_a_request.error.unwrap().code, error_codes::INVALID_REQUEST);
    assert_eq!(not_a_request.id, Some(json!(4)));
}

#[tokio::test]
async fn test_ping_echoes_id() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let response = send(&resources, json!({"jsonrpc": "2.0", "id": "abc", "method": "ping"}))
        .await
        .unwrap();

    assert_eq!(response.id, Some(json!("abc")));
    assert_eq!(response.result, Some(json!({})));
}

#[tokio::test]
async fn test_tools_list_has_schemas() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let result = result_of(&resources, request(5, "tools/list", json!({}))).await;

    let tools = result["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert!(names.contains(&"query_activities"));
    assert!(names.contains(&"get_daily_health"));
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_tools_call_wraps_envelope() {
    let api = Arc::new(MockFitnessApi::new().with_activities(recent_runs(3)));
    let resources = server(&api);

    let result = result_of(
        &resources,
        request(
            6,
            "tools/call",
            json!({"name": "query_activities", "arguments": {"limit": 2}}),
        ),
    )
    .await;

    assert_eq!(result["isError"], false);
    assert_eq!(result["content"][0]["type"], "text");
    let envelope: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(envelope["data"]["count"], 2);
    assert_eq!(envelope["pagination"]["has_more"], true);
}

#[tokio::test]
async fn test_tool_failure_is_error_result_not_rpc_error() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let result = result_of(
        &resources,
        request(
            7,
            "tools/call",
            json!({"name": "query_activities", "arguments": {"cursor": "bogus"}}),
        ),
    )
    .await;

    assert_eq!(result["isError"], true);
    let envelope: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(envelope["error"]["kind"], "invalid_cursor");
}

#[tokio::test]
async fn test_unknown_tool_and_missing_params() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let unknown = error_code_of(
        &resources,
        request(8, "tools/call", json!({"name": "delete_everything"})),
    )
    .await;
    assert_eq!(unknown, error_codes::INVALID_PARAMS);

    let missing = error_code_of(
        &resources,
        json!({"jsonrpc": "2.0", "id": 9, "method": "tools/call"}),
    )
    .await;
    assert_eq!(missing, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_resources_list_and_read() {
    let api = Arc::new(MockFitnessApi::new().with_activities(recent_runs(12)));
    let resources = server(&api);

    let listed = result_of(&resources, request(10, "resources/list", json!({}))).await;
    let uris: Vec<&str> = listed["resources"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["uri"].as_str())
        .collect();
    assert_eq!(
        uris,
        vec![
            "garmin://profile",
            "garmin://activities/recent",
            "garmin://health/today",
            "garmin://guide/periods",
        ]
    );

    let read = result_of(
        &resources,
        request(11, "resources/read", json!({"uri": "garmin://activities/recent"})),
    )
    .await;
    let contents = &read["contents"][0];
    assert_eq!(contents["uri"], "garmin://activities/recent");
    assert_eq!(contents["mimeType"], "application/json");
    let envelope: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
    assert_eq!(envelope["data"]["count"], 10);

    let guide = result_of(
        &resources,
        request(12, "resources/read", json!({"uri": "garmin://guide/periods"})),
    )
    .await;
    assert!(guide["contents"][0]["text"].as_str().unwrap().contains("this-week"));

    let unknown = error_code_of(
        &resources,
        request(13, "resources/read", json!({"uri": "garmin://nothing"})),
    )
    .await;
    assert_eq!(unknown, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_prompts_list_and_get() {
    let resources = server(&Arc::new(MockFitnessApi::new()));

    let listed = result_of(&resources, request(14, "prompts/list", json!({}))).await;
    assert_eq!(listed["prompts"].as_array().unwrap().len(), 4);

    let prompt = result_of(
        &resources,
        request(
            15,
            "prompts/get",
            json!({"name": "compare_recent_activities", "arguments": {"count": 4, "activity_type": "running"}}),
        ),
    )
    .await;
    assert_eq!(prompt["messages"][0]["role"], "user");
    let text = prompt["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("activity_type=\"running\" and limit=4"));

    let bad_count = error_code_of(
        &resources,
        request(
            16,
            "prompts/get",
            json!({"name": "compare_recent_activities", "arguments": {"count": "12"}}),
        ),
    )
    .await;
    assert_eq!(bad_count, error_codes::INVALID_PARAMS);

    let unknown = error_code_of(&resources, request(17, "prompts/get", json!({"name": "nope"}))).await;
    assert_eq!(unknown, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_serve_writes_one_line_per_reply() {
    let resources = server(&Arc::new(MockFitnessApi::new()));
    let input = [
        request(1, "initialize", json!({})).to_string(),
        String::new(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        request(2, "ping", json!({})).to_string(),
        "garbage".to_owned(),
    ]
    .join("\n");

    let mut output: Vec<u8> = Vec::new();
    serve(input.as_bytes(), &mut output, &resources).await.unwrap();

    let replies: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["id"], 1);
    assert_eq!(replies[1]["id"], 2);
    assert_eq!(replies[2]["error"]["code"], -32700);
    assert!(replies[2]["id"].is_null());
}

#[test]
fn test_tool_catalog_groups_by_category() {
    let catalog = registry().catalog();

    assert_eq!(catalog["tool_count"], registry().len());
    let analysis = catalog["categories"]["analysis"].as_array().unwrap();
    assert!(analysis.contains(&json!("compare_activities")));
    assert!(catalog["categories"]["activities"]
        .as_array()
        .unwrap()
        .contains(&json!("query_activities")));
    assert_eq!(
        catalog["analytics"],
        json!([
            "analyze_training_period",
            "compare_activities",
            "find_similar_activities"
        ])
    );
}
