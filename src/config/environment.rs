// ABOUTME: Environment-based configuration for the Garmin connection and tool behavior
// ABOUTME: Parses GARMIN_* variables with defaults and reports malformed values as configuration errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use garmin_core::constants::limits;
use garmin_core::errors::{AppError, AppResult};
use garmin_core::units::UnitSystem;
use garmin_providers::{
    GarminClientConfig, HttpSettings, RetryConfig, TokenSource, DEFAULT_API_BASE_URL,
};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Environment variable naming the token store directory
pub const GARMINTOKENS: &str = "GARMINTOKENS";
/// Environment variable holding an explicit bearer token
pub const GARMIN_ACCESS_TOKEN: &str = "GARMIN_ACCESS_TOKEN";

const DEFAULT_TOKEN_DIR: &str = "~/.garminconnect";

/// Upper bound on `GARMIN_MAX_RETRIES`; backoff doubles per attempt
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Garmin Connect connection settings
#[derive(Debug, Clone)]
pub struct GarminConfig {
    /// Directory holding `oauth2_token.json`
    pub token_dir: PathBuf,
    /// Explicit token that bypasses the token directory
    pub access_token: Option<String>,
    /// API host
    pub api_base_url: String,
    /// Request timeout
    pub http_timeout_secs: u64,
    /// TCP connect timeout
    pub connect_timeout_secs: u64,
    /// Attempts on HTTP 429 before giving up
    pub max_retries: u32,
}

impl GarminConfig {
    /// Token source derived from these settings
    #[must_use]
    pub fn token_source(&self) -> TokenSource {
        self.access_token.as_ref().map_or_else(
            || TokenSource::Directory(self.token_dir.clone()),
            |token| TokenSource::Static(token.clone()),
        )
    }

    /// Client settings for the Garmin Connect API client
    #[must_use]
    pub fn client_config(&self) -> GarminClientConfig {
        GarminClientConfig {
            api_base_url: self.api_base_url.clone(),
            token_source: self.token_source(),
            retry: RetryConfig {
                max_retries: self.max_retries,
                ..RetryConfig::default()
            },
            http: HttpSettings {
                timeout_secs: self.http_timeout_secs,
                connect_timeout_secs: self.connect_timeout_secs,
                ..HttpSettings::default()
            },
        }
    }
}

/// Tool behavior settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Page size used when a caller gives no `limit`
    pub default_activity_limit: u32,
    /// Largest accepted `limit`
    pub max_activity_limit: u32,
    /// Unit system used when a caller gives no `unit`
    pub unit_system: UnitSystem,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_activity_limit: limits::DEFAULT_PAGE_LIMIT,
            max_activity_limit: limits::MAX_PAGE_LIMIT,
            unit_system: UnitSystem::Metric,
        }
    }
}

impl ToolConfig {
    /// Clamp a requested page size into `1..=max_activity_limit`
    #[must_use]
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_activity_limit)
            .clamp(1, self.max_activity_limit)
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Garmin connection
    pub garmin: GarminConfig,
    /// Tool defaults
    pub tools: ToolConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment and an optional `.env`
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a variable is present but malformed, or
    /// when the default limit exceeds the maximum
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let garmin = GarminConfig {
            token_dir: expand_home(&env_var_or(GARMINTOKENS, DEFAULT_TOKEN_DIR)),
            access_token: env::var(GARMIN_ACCESS_TOKEN)
                .ok()
                .filter(|token| !token.trim().is_empty()),
            api_base_url: env_var_or("GARMIN_API_BASE_URL", DEFAULT_API_BASE_URL),
            http_timeout_secs: parse_env("GARMIN_HTTP_TIMEOUT_SECS", 30)?,
            connect_timeout_secs: parse_env("GARMIN_CONNECT_TIMEOUT_SECS", 10)?,
            max_retries: parse_env("GARMIN_MAX_RETRIES", 3)?,
        };

        let tools = ToolConfig {
            default_activity_limit: parse_env(
                "GARMIN_TOOL_DEFAULT_ACTIVITY_LIMIT",
                limits::DEFAULT_PAGE_LIMIT,
            )?,
            max_activity_limit: parse_env(
                "GARMIN_TOOL_MAX_ACTIVITY_LIMIT",
                limits::MAX_PAGE_LIMIT,
            )?,
            unit_system: parse_env("GARMIN_TOOL_UNIT_SYSTEM", UnitSystem::Metric)?,
        };

        let config = Self { garmin, tools };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first violated constraint
    pub fn validate(&self) -> AppResult<()> {
        if self.tools.max_activity_limit == 0 {
            return Err(AppError::config(
                "GARMIN_TOOL_MAX_ACTIVITY_LIMIT must be at least 1",
            ));
        }
        if self.tools.default_activity_limit == 0
            || self.tools.default_activity_limit > self.tools.max_activity_limit
        {
            return Err(AppError::config(format!(
                "GARMIN_TOOL_DEFAULT_ACTIVITY_LIMIT must be between 1 and {}",
                self.tools.max_activity_limit
            )));
        }
        if self.garmin.http_timeout_secs == 0 {
            return Err(AppError::config("GARMIN_HTTP_TIMEOUT_SECS must be at least 1"));
        }
        if self.garmin.max_retries == 0 || self.garmin.max_retries > MAX_RETRY_ATTEMPTS {
            return Err(AppError::config(format!(
                "GARMIN_MAX_RETRIES must be between 1 and {MAX_RETRY_ATTEMPTS}"
            )));
        }
        Ok(())
    }

    /// Redacted summary for `--check-config` and startup logs
    #[must_use]
    pub fn summary(&self) -> Value {
        json!({
            "garmin": {
                "token_dir": self.garmin.token_dir.display().to_string(),
                "access_token": if self.garmin.access_token.is_some() { "[set]" } else { "[unset]" },
                "api_base_url": self.garmin.api_base_url,
                "http_timeout_secs": self.garmin.http_timeout_secs,
                "connect_timeout_secs": self.garmin.connect_timeout_secs,
                "max_retries": self.garmin.max_retries,
            },
            "tools": {
                "default_activity_limit": self.tools.default_activity_limit,
                "max_activity_limit": self.tools.max_activity_limit,
                "unit_system": self.tools.unit_system.as_str(),
            }
        })
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        _ => Ok(default),
    }
}

/// Expand a leading `~` to the home directory
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        let config = ToolConfig::default();
        assert_eq!(config.clamp_limit(None), 20);
        assert_eq!(config.clamp_limit(Some(0)), 1);
        assert_eq!(config.clamp_limit(Some(500)), 100);
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/var/tokens"), PathBuf::from("/var/tokens"));
    }
}
