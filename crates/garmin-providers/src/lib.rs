// ABOUTME: Garmin Connect data access for the MCP server
// ABOUTME: FitnessApi seam, HTTPS client with configured timeouts, and OAuth2 token loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Garmin Connect API access.
//!
//! Tool code depends only on [`FitnessApi`]; [`GarminConnectClient`] is the
//! production implementation.

pub use garmin_core::errors;

/// Typed API operations and the `FitnessApi` trait
pub mod api;
/// Garmin Connect HTTPS client
pub mod garmin;
/// HTTP client construction
pub mod http_client;
/// OAuth2 token loading
pub mod tokens;

pub use api::{ApiCall, ChallengeKind, FitnessApi};
pub use garmin::{
    build_endpoint, Endpoint, GarminClientConfig, GarminConnectClient, Identity, RetryConfig,
    DEFAULT_API_BASE_URL,
};
pub use garmin_core::errors::ProviderError;
pub use http_client::{build_http_client, HttpSettings, GARMIN_USER_AGENT};
pub use tokens::{AccessToken, TokenSource, OAUTH2_TOKEN_FILE};
