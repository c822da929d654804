// ABOUTME: Builds the pooled reqwest client used for Garmin Connect API calls
// ABOUTME: Applies configured request and connect timeouts plus the Garmin Connect mobile user agent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use garmin_core::constants::providers;
use garmin_core::errors::ProviderError;
use reqwest::{Client, ClientBuilder};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// User agent of the Garmin Connect mobile app, which connectapi expects for OAuth2 bearer calls
pub const GARMIN_USER_AGENT: &str = "GCM-iOS-5.7.2.1";

/// Transport settings for Garmin Connect traffic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// TCP and TLS connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: GARMIN_USER_AGENT.to_owned(),
        }
    }
}

impl HttpSettings {
    /// Whole-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Build the connection-pooling client for one [`crate::GarminConnectClient`]
///
/// # Errors
///
/// Returns `ProviderError::Network` if the TLS backend cannot be initialized
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, ProviderError> {
    ClientBuilder::new()
        .timeout(settings.timeout())
        .connect_timeout(settings.connect_timeout())
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| ProviderError::Network {
            provider: providers::GARMIN.to_owned(),
            message: format!("failed to build HTTP client: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = HttpSettings::default();
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.user_agent, GARMIN_USER_AGENT);
    }

    #[test]
    fn test_build_with_custom_timeouts() {
        let settings = HttpSettings {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            user_agent: "garmin-mcp-server-test".to_owned(),
        };
        assert!(build_http_client(&settings).is_ok());
    }

    #[test]
    fn test_invalid_user_agent_is_network_error() {
        let settings = HttpSettings {
            user_agent: "bad\nagent".to_owned(),
            ..HttpSettings::default()
        };
        let error = build_http_client(&settings).unwrap_err();
        assert!(matches!(error, ProviderError::Network { .. }));
    }
}
