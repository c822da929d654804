// ABOUTME: MCP protocol constants for version and server identification
// ABOUTME: Pure compile-time constants without runtime configuration dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Protocol constants for MCP and JSON-RPC

/// JSON-RPC version (standard, not configurable)
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this server speaks
pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";

/// Server name reported during `initialize`
pub const SERVER_NAME: &str = "garmin-mcp-server";

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
