// ABOUTME: Structured error types for remote fitness API failures
// ABOUTME: Maps HTTP status classes onto authentication, rate limit, not found, and generic API errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::ErrorCode;
#[cfg(feature = "provider-errors")]
use crate::constants::providers;

/// Errors raised by a fitness data provider client.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials missing, expired, or rejected (HTTP 401/403)
    #[error("Authentication with {provider} failed: {reason}")]
    Authentication {
        /// Provider name
        provider: String,
        /// Why authentication failed
        reason: String,
    },

    /// Upstream throttling (HTTP 429)
    #[error("{provider} rate limit exceeded")]
    RateLimit {
        /// Provider name
        provider: String,
        /// Seconds to wait, when the provider says so
        retry_after_secs: Option<u64>,
    },

    /// Requested record does not exist (HTTP 404)
    #[error("{resource} not found on {provider}")]
    NotFound {
        /// Provider name
        provider: String,
        /// Description of the missing resource
        resource: String,
    },

    /// Any other non-success response
    #[error("{provider} API error (status {status}): {message}")]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body excerpt or reason phrase
        message: String,
    },

    /// Transport failure before a response arrived
    #[error("Network error talking to {provider}: {message}")]
    Network {
        /// Provider name
        provider: String,
        /// Underlying transport error
        message: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// Provider name
        provider: String,
        /// Decode failure details
        message: String,
    },
}

impl ProviderError {
    /// Classify an HTTP failure status into the matching variant
    #[must_use]
    pub fn from_status(
        provider: &str,
        status: u16,
        resource: &str,
        body: impl Into<String>,
    ) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                provider: provider.to_owned(),
                reason: format!("request rejected with status {status}"),
            },
            404 => Self::NotFound {
                provider: provider.to_owned(),
                resource: resource.to_owned(),
            },
            429 => Self::RateLimit {
                provider: provider.to_owned(),
                retry_after_secs: None,
            },
            _ => Self::Api {
                provider: provider.to_owned(),
                status,
                message: body.into(),
            },
        }
    }

    /// Error code used when this failure reaches a caller
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Authentication { .. } => ErrorCode::AuthenticationError,
            Self::RateLimit { .. } => ErrorCode::RateLimitError,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Api { .. } | Self::Network { .. } | Self::InvalidResponse { .. } => {
                ErrorCode::ApiError
            }
        }
    }

    /// Whether retrying later could succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Network { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        let provider = providers::GARMIN.to_owned();
        if error.is_decode() {
            return Self::InvalidResponse {
                provider,
                message: error.to_string(),
            };
        }
        match error.status() {
            Some(status) => {
                Self::from_status(&provider, status.as_u16(), "resource", error.to_string())
            }
            None => Self::Network {
                provider,
                message: error.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ProviderError::from_status("garmin", 401, "x", ""),
            ProviderError::Authentication { .. }
        ));
        assert!(matches!(
            ProviderError::from_status("garmin", 403, "x", ""),
            ProviderError::Authentication { .. }
        ));
        assert!(matches!(
            ProviderError::from_status("garmin", 404, "activity 1", ""),
            ProviderError::NotFound { .. }
        ));
        assert!(matches!(
            ProviderError::from_status("garmin", 429, "x", ""),
            ProviderError::RateLimit { .. }
        ));
        assert!(matches!(
            ProviderError::from_status("garmin", 500, "x", "boom"),
            ProviderError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::from_status("garmin", 503, "x", "").is_transient());
        assert!(!ProviderError::from_status("garmin", 404, "x", "").is_transient());
    }
}
