// ABOUTME: Main library entry point for the Garmin Connect MCP server
// ABOUTME: Exposes Garmin Connect activities, wellness and training data to MCP clients over stdio
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Garmin MCP Server
//!
//! A Model Context Protocol (MCP) server that turns Garmin Connect into
//! tools, resources and prompts for AI assistants.
//!
//! ## Features
//!
//! - **Uniform envelopes**: every tool answers with `data`, optional
//!   `analysis` and `pagination`, and `metadata`, or with `error`
//! - **Stateless cursors**: paginated tools hand back a signed cursor that
//!   carries the original filters, so a continuation needs nothing else
//! - **Period expressions**: `7d`, `last-week`, `ytd`, `2024-01-01:2024-01-31`
//! - **Local analysis**: training period summaries, activity comparison,
//!   similarity search and wellness insights computed from raw Garmin data
//!
//! ## Architecture
//!
//! - **`garmin_core`**: cursor codec, envelopes, time ranges, units, errors
//! - **`garmin_providers`**: the `FitnessApi` seam and the Garmin Connect client
//! - **tools**: one `McpTool` per operation, registered at startup
//! - **mcp**: JSON-RPC dispatch, resources, prompts and the stdio transport
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use garmin_core::clock::SystemClock;
//! use garmin_mcp_server::config::ServerConfig;
//! use garmin_mcp_server::mcp::resources::ServerResources;
//! use garmin_mcp_server::mcp::transport::run_stdio_transport;
//! use garmin_providers::GarminConnectClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let client = GarminConnectClient::new(config.garmin.client_config())?;
//!     let resources = ServerResources::with_builtins(
//!         Arc::new(client),
//!         Arc::new(config.tools),
//!         Arc::new(SystemClock),
//!     );
//!     run_stdio_transport(resources).await
//! }
//! ```

/// Configuration management from environment variables
pub mod config;

/// Application constants: protocol identity, resource URIs, prompt names
pub mod constants;

/// Unified error handling re-exported from `garmin_core`
pub mod errors;

/// Local analysis of activities and wellness data
pub mod intelligence;

/// JSON-RPC 2.0 message types
pub mod jsonrpc;

/// Structured logging to stderr
pub mod logging;

/// Model Context Protocol server implementation
pub mod mcp;

/// MCP tools and their registry
pub mod tools;

pub use garmin_core;
pub use garmin_providers;
