// ABOUTME: Integration tests for loading Garmin OAuth2 tokens from a token directory or the environment
// ABOUTME: Uses temporary directories so no real token store is touched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use std::fmt::Debug;
use std::fs;

use chrono::{DateTime, TimeZone, Utc};
use garmin_providers::{ProviderError, TokenSource, OAUTH2_TOKEN_FILE};
use serde_json::json;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

fn token_dir(contents: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(OAUTH2_TOKEN_FILE), contents).unwrap();
    dir
}

fn assert_auth_error(result: Result<impl Debug, ProviderError>) {
    match result {
        Err(ProviderError::Authentication { provider, .. }) => assert_eq!(provider, "garmin"),
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[test]
fn test_directory_token_loads() {
    let expires = now().timestamp() + 3600;
    let dir = token_dir(
        &json!({
            "access_token": "abc123",
            "refresh_token": "ignored",
            "expires_at": expires,
        })
        .to_string(),
    );

    let token = TokenSource::Directory(dir.path().to_path_buf())
        .load(now())
        .unwrap();

    assert_eq!(token.secret(), "abc123");
    assert_eq!(token.expires_at().map(|t| t.timestamp()), Some(expires));
}

#[test]
fn test_token_without_expiry_never_expires() {
    let dir = token_dir(r#"{"access_token": "abc123"}"#);

    let token = TokenSource::Directory(dir.path().to_path_buf())
        .load(now())
        .unwrap();

    assert!(token.expires_at().is_none());
}

#[test]
fn test_expired_token_rejected() {
    let dir = token_dir(
        &json!({"access_token": "abc123", "expires_at": now().timestamp() - 1}).to_string(),
    );

    assert_auth_error(TokenSource::Directory(dir.path().to_path_buf()).load(now()));
}

#[test]
fn test_missing_and_malformed_files_rejected() {
    let empty = tempfile::tempdir().unwrap();
    assert_auth_error(TokenSource::Directory(empty.path().to_path_buf()).load(now()));

    let malformed = token_dir("{not json");
    assert_auth_error(TokenSource::Directory(malformed.path().to_path_buf()).load(now()));

    let no_token = token_dir(r#"{"refresh_token": "only"}"#);
    assert_auth_error(TokenSource::Directory(no_token.path().to_path_buf()).load(now()));
}

#[test]
fn test_static_token() {
    let token = TokenSource::Static("from-env".to_owned()).load(now()).unwrap();
    assert_eq!(token.secret(), "from-env");

    assert_auth_error(TokenSource::Static("   ".to_owned()).load(now()));
}
