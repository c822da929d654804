// ABOUTME: Stdio MCP server binary exposing Garmin Connect data as tools, resources and prompts
// ABOUTME: Loads environment configuration, applies CLI overrides, and serves JSON-RPC on stdin/stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Garmin MCP Server Binary
//!
//! Logs go to stderr; stdout carries only protocol messages.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use garmin_core::clock::SystemClock;
use garmin_core::units::UnitSystem;
use garmin_mcp_server::config::ServerConfig;
use garmin_mcp_server::logging;
use garmin_mcp_server::mcp::resources::ServerResources;
use garmin_mcp_server::mcp::transport::run_stdio_transport;
use garmin_mcp_server::tools::ToolRegistry;
use garmin_providers::GarminConnectClient;
use serde_json::json;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "garmin-mcp-server")]
#[command(about = "MCP server exposing Garmin Connect activities, health and training data")]
#[command(version)]
pub struct Args {
    /// Directory holding oauth2_token.json (overrides GARMINTOKENS)
    #[arg(long)]
    token_dir: Option<PathBuf>,

    /// Default unit system for formatted values (overrides GARMIN_TOOL_UNIT_SYSTEM)
    #[arg(long)]
    unit_system: Option<UnitSystem>,

    /// Print the resolved configuration and token status, then exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(token_dir) = args.token_dir {
        config.garmin.token_dir = token_dir;
    }
    if let Some(unit_system) = args.unit_system {
        config.tools.unit_system = unit_system;
    }

    let client = GarminConnectClient::new(config.garmin.client_config())?;
    let token_status = client.check_token();

    if args.check_config {
        let token = match &token_status {
            Ok(()) => "ok".to_owned(),
            Err(e) => e.to_string(),
        };
        let mut tools = ToolRegistry::new();
        tools.register_builtin_tools();
        let report = json!({
            "config": config.summary(),
            "token": token,
            "tools": tools.catalog(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Err(e) = token_status {
        warn!("Garmin token not usable yet, tool calls will fail until it is: {e}");
    }

    info!("Starting Garmin MCP server");
    info!("Configuration: {}", config.summary());

    let resources = ServerResources::with_builtins(
        Arc::new(client),
        Arc::new(config.tools),
        Arc::new(SystemClock),
    );
    info!(
        tools = resources.tools.len(),
        resources = resources.resources.len(),
        prompts = resources.prompts.len(),
        "Registries ready"
    );

    run_stdio_transport(resources).await
}
