// ABOUTME: Configuration management module for the Garmin MCP server
// ABOUTME: Environment-driven settings for the Garmin connection and tool defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the Garmin MCP server.
//!
//! All settings come from environment variables (optionally through a `.env`
//! file); command-line flags override a subset of them in the binary.

/// Environment and server configuration
pub mod environment;

pub use environment::{GarminConfig, ServerConfig, ToolConfig};
