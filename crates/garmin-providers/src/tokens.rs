// ABOUTME: Loads the Garmin Connect OAuth2 bearer token from the environment or a token directory
// ABOUTME: Reads oauth2_token.json as written by the Garmin authentication setup and rejects expired tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use garmin_core::constants::providers;
use garmin_core::errors::ProviderError;
use serde::Deserialize;
use tracing::{debug, info};

/// File name of the OAuth2 token inside the token directory
pub const OAUTH2_TOKEN_FILE: &str = "oauth2_token.json";

/// Bearer token used for Garmin Connect API requests
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Wrap a raw bearer token with an optional expiry
    #[must_use]
    pub const fn new(value: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { value, expires_at }
    }

    /// Raw token value for the Authorization header
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.value
    }

    /// Expiry instant, when known
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the token is past its expiry at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// On-disk token format; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct StoredOAuth2Token {
    access_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

/// Where the access token comes from
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// A token passed directly, e.g. through `GARMIN_ACCESS_TOKEN`
    Static(String),
    /// A directory holding `oauth2_token.json`
    Directory(PathBuf),
}

impl TokenSource {
    /// Load the token, checking expiry against `now`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Authentication` when the token is missing,
    /// unreadable, malformed, or expired
    pub fn load(&self, now: DateTime<Utc>) -> Result<AccessToken, ProviderError> {
        let token = match self {
            Self::Static(value) => {
                debug!("Using Garmin access token from environment");
                AccessToken::new(value.clone(), None)
            }
            Self::Directory(dir) => load_token_file(dir)?,
        };

        if token.value.trim().is_empty() {
            return Err(auth_error("access token is empty"));
        }
        if token.is_expired_at(now) {
            return Err(auth_error("stored access token has expired"));
        }
        Ok(token)
    }
}

fn load_token_file(dir: &Path) -> Result<AccessToken, ProviderError> {
    let path = dir.join(OAUTH2_TOKEN_FILE);
    let contents = fs::read_to_string(&path).map_err(|e| {
        auth_error(format!("no readable token at {}: {e}", path.display()))
    })?;
    let stored: StoredOAuth2Token = serde_json::from_str(&contents)
        .map_err(|e| auth_error(format!("token file {} is malformed: {e}", path.display())))?;

    let expires_at = stored
        .expires_at
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    info!("Loaded Garmin OAuth2 token from {}", path.display());
    Ok(AccessToken::new(stored.access_token, expires_at))
}

fn auth_error(reason: impl Into<String>) -> ProviderError {
    ProviderError::Authentication {
        provider: providers::GARMIN.to_owned(),
        reason: reason.into(),
    }
}
