// ABOUTME: Centralized resource container for dependency injection in MCP server
// ABOUTME: Bundles the tool, resource and prompt registries with the shared execution context
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Server Resources Module
//!
//! Everything a request handler needs, built once at startup and shared by
//! `Arc`. Cloning `ServerResources` clones pointers, not registries.

use std::sync::Arc;

use garmin_core::clock::Clock;
use garmin_providers::FitnessApi;

use crate::config::ToolConfig;
use crate::mcp::prompts::PromptRegistry;
use crate::mcp::resource_registry::ResourceRegistry;
use crate::tools::{ToolExecutionContext, ToolRegistry};

/// Centralized resource container for dependency injection
#[derive(Clone, Debug)]
pub struct ServerResources {
    /// Registered tools
    pub tools: Arc<ToolRegistry>,
    /// Registered resources
    pub resources: Arc<ResourceRegistry>,
    /// Registered prompts
    pub prompts: Arc<PromptRegistry>,
    /// Collaborators handed to every tool call
    pub context: ToolExecutionContext,
}

impl ServerResources {
    /// Assemble resources from prebuilt registries
    #[must_use]
    pub fn new(
        tools: ToolRegistry,
        resources: ResourceRegistry,
        prompts: PromptRegistry,
        context: ToolExecutionContext,
    ) -> Self {
        Self {
            tools: Arc::new(tools),
            resources: Arc::new(resources),
            prompts: Arc::new(prompts),
            context,
        }
    }

    /// Build the server with every built-in tool, resource and prompt
    #[must_use]
    pub fn with_builtins(
        api: Arc<dyn FitnessApi>,
        config: Arc<ToolConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut tools = ToolRegistry::new();
        tools.register_builtin_tools();

        let mut resources = ResourceRegistry::new();
        resources.register_builtin_resources(&tools);

        let mut prompts = PromptRegistry::new();
        prompts.register_builtin_prompts();

        Self::new(
            tools,
            resources,
            prompts,
            ToolExecutionContext::new(api, config, clock),
        )
    }
}
