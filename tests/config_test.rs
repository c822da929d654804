// ABOUTME: Integration tests for environment-driven server configuration
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use std::env;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use garmin_core::errors::ErrorCode;
use garmin_core::units::UnitSystem;
use garmin_mcp_server::config::ServerConfig;
use garmin_providers::{GarminConnectClient, TokenSource, GARMIN_USER_AGENT, OAUTH2_TOKEN_FILE};
use serial_test::serial;

const VARS: [&str; 9] = [
    "GARMINTOKENS",
    "GARMIN_ACCESS_TOKEN",
    "GARMIN_API_BASE_URL",
    "GARMIN_HTTP_TIMEOUT_SECS",
    "GARMIN_CONNECT_TIMEOUT_SECS",
    "GARMIN_MAX_RETRIES",
    "GARMIN_TOOL_DEFAULT_ACTIVITY_LIMIT",
    "GARMIN_TOOL_MAX_ACTIVITY_LIMIT",
    "GARMIN_TOOL_UNIT_SYSTEM",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.tools.default_activity_limit, 20);
    assert_eq!(config.tools.max_activity_limit, 100);
    assert_eq!(config.tools.unit_system, UnitSystem::Metric);
    assert_eq!(config.garmin.max_retries, 3);
    assert!(config.garmin.access_token.is_none());
    assert!(config.garmin.token_dir.ends_with(".garminconnect"));
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_env();
    env::set_var("GARMINTOKENS", "/tmp/garmin-tokens");
    env::set_var("GARMIN_TOOL_DEFAULT_ACTIVITY_LIMIT", "15");
    env::set_var("GARMIN_TOOL_MAX_ACTIVITY_LIMIT", "50");
    env::set_var("GARMIN_TOOL_UNIT_SYSTEM", "Imperial");
    env::set_var("GARMIN_MAX_RETRIES", "5");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.garmin.token_dir, PathBuf::from("/tmp/garmin-tokens"));
    assert_eq!(config.tools.default_activity_limit, 15);
    assert_eq!(config.tools.max_activity_limit, 50);
    assert_eq!(config.tools.unit_system, UnitSystem::Imperial);
    assert_eq!(config.garmin.client_config().retry.max_retries, 5);
    assert!(matches!(
        config.garmin.token_source(),
        TokenSource::Directory(dir) if dir == PathBuf::from("/tmp/garmin-tokens")
    ));
}

#[test]
#[serial]
fn test_access_token_wins_and_is_redacted() {
    clear_env();
    env::set_var("GARMIN_ACCESS_TOKEN", "very-secret");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert!(matches!(config.garmin.token_source(), TokenSource::Static(_)));
    let summary = config.summary().to_string();
    assert!(!summary.contains("very-secret"));
    assert!(summary.contains("[set]"));
}

#[test]
#[serial]
fn test_malformed_values_are_config_errors() {
    clear_env();
    env::set_var("GARMIN_HTTP_TIMEOUT_SECS", "soon");
    let timeout = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(timeout.code, ErrorCode::ConfigError);
    assert!(timeout.message.contains("GARMIN_HTTP_TIMEOUT_SECS"));

    env::set_var("GARMIN_TOOL_UNIT_SYSTEM", "furlongs");
    let unit = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(unit.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_default_limit_above_max_rejected() {
    clear_env();
    env::set_var("GARMIN_TOOL_DEFAULT_ACTIVITY_LIMIT", "80");
    env::set_var("GARMIN_TOOL_MAX_ACTIVITY_LIMIT", "40");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_token_directory_feeds_client() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(OAUTH2_TOKEN_FILE),
        r#"{"access_token": "stored-token"}"#,
    )
    .unwrap();
    env::set_var("GARMINTOKENS", dir.path());

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    let token = config.garmin.token_source().load(Utc::now()).unwrap();
    assert_eq!(token.secret(), "stored-token");
}

#[test]
#[serial]
fn test_timeouts_feed_http_client() {
    clear_env();
    env::set_var("GARMIN_HTTP_TIMEOUT_SECS", "12");
    env::set_var("GARMIN_CONNECT_TIMEOUT_SECS", "4");
    env::set_var("GARMIN_ACCESS_TOKEN", "token");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    let client_config = config.garmin.client_config();
    assert_eq!(client_config.http.timeout_secs, 12);
    assert_eq!(client_config.http.connect_timeout_secs, 4);
    assert_eq!(client_config.http.user_agent, GARMIN_USER_AGENT);

    let client = GarminConnectClient::new(client_config).unwrap();
    assert!(client.check_token().is_ok());
}

#[test]
#[serial]
fn test_retry_count_bounded() {
    clear_env();
    env::set_var("GARMIN_MAX_RETRIES", "64");
    let too_many = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(too_many.code, ErrorCode::ConfigError);
    assert!(too_many.message.contains("GARMIN_MAX_RETRIES"));

    env::set_var("GARMIN_MAX_RETRIES", "0");
    let none = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(none.code, ErrorCode::ConfigError);

    env::set_var("GARMIN_MAX_RETRIES", "10");
    assert!(ServerConfig::from_env().is_ok());
    clear_env();
}
