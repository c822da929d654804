// ABOUTME: Model Context Protocol (MCP) implementation for AI assistant integration
// ABOUTME: Protocol dispatch, schemas, resource and prompt registries, and the stdio transport
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Prompt templates and their registry
pub mod prompts;
/// JSON-RPC method dispatch
pub mod protocol;
/// Resource definitions and their registry
pub mod resource_registry;
/// Shared server state handed to every request
pub mod resources;
/// MCP payload types
pub mod schema;
/// Stdio transport loop
pub mod transport;
