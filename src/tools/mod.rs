// ABOUTME: MCP tool layer: trait, registry, execution context, argument parsing, and implementations
// ABOUTME: Tools parse arguments, call the Garmin API through the context, and render envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Tool layer for the Garmin MCP server
//!
//! Every tool implements [`McpTool`] and is registered in a [`ToolRegistry`]
//! at startup. Tools receive a [`ToolExecutionContext`] per call; nothing is
//! looked up from global state.

/// Per-call collaborators: API handle, configuration, clock
pub mod context;
/// Tool-specific error types
pub mod errors;
/// Tool implementations by category
pub mod implementations;
/// Page requests for fresh queries and cursor continuations
pub mod paging;
/// Argument parsing and query intent classification
pub mod params;
/// Tool registry and execution
pub mod registry;
/// Tool results returned to the protocol layer
pub mod result;
/// `McpTool` trait and capability flags
pub mod traits;

pub use context::ToolExecutionContext;
pub use errors::ToolError;
pub use params::QueryIntent;
pub use registry::ToolRegistry;
pub use result::ToolResult;
pub use traits::{McpTool, ToolCapabilities};
