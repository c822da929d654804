// ABOUTME: Unified error handling with standard error codes and envelope kind tags
// ABOUTME: Defines AppError, ErrorCode, AppResult and conversions from provider failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every failure that can reach a caller is an [`AppError`] carrying an
//! [`ErrorCode`]. The code decides the machine-readable `kind` tag written into
//! error envelopes, so tool implementations never format error JSON by hand.
//!
//! Failures of the remote API are modelled separately as [`ProviderError`]
//! and converted with `From`, keeping the HTTP client free of envelope logic.

/// Provider (remote API) error types
pub mod provider;

pub use provider::ProviderError;

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::constants::error_kinds;

/// Standard error codes used throughout the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Caller input (1000-1999)
    /// Pagination cursor was malformed, truncated, or tampered with
    #[serde(rename = "INVALID_CURSOR")]
    InvalidCursor = 1000,
    /// A tool argument was missing or out of range
    #[serde(rename = "INVALID_ARGUMENT")]
    InvalidArgument = 1001,
    /// A period expression could not be parsed
    #[serde(rename = "INVALID_TIME_RANGE")]
    InvalidTimeRange = 1002,

    // Remote API (2000-2999)
    /// Generic remote API failure
    #[serde(rename = "API_ERROR")]
    ApiError = 2000,
    /// Stored credentials were rejected or are missing
    #[serde(rename = "AUTHENTICATION_ERROR")]
    AuthenticationError = 2001,
    /// Remote API throttled the request
    #[serde(rename = "RATE_LIMIT_ERROR")]
    RateLimitError = 2002,
    /// Requested record does not exist upstream
    #[serde(rename = "NOT_FOUND")]
    NotFound = 2003,

    // Analysis (3000-3999)
    /// Not enough data points to compute an analysis
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData = 3000,

    // Server (9000-9999)
    /// Configuration could not be loaded
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 9000,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9001,
}

impl ErrorCode {
    /// Machine-readable tag written into the `kind` field of error envelopes
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCursor => error_kinds::INVALID_CURSOR,
            Self::InvalidArgument => error_kinds::INVALID_ARGUMENT,
            Self::InvalidTimeRange => error_kinds::INVALID_TIME_RANGE,
            Self::ApiError => error_kinds::API_ERROR,
            Self::AuthenticationError => error_kinds::AUTHENTICATION_ERROR,
            Self::RateLimitError => error_kinds::RATE_LIMIT_ERROR,
            Self::NotFound => error_kinds::NOT_FOUND,
            Self::InsufficientData => error_kinds::INSUFFICIENT_DATA,
            Self::ConfigError => error_kinds::CONFIG_ERROR,
            Self::InternalError => error_kinds::INTERNAL_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidCursor => "The pagination cursor is invalid",
            Self::InvalidArgument => "The provided argument is invalid",
            Self::InvalidTimeRange => "The time range could not be understood",
            Self::ApiError => "The Garmin Connect API returned an error",
            Self::AuthenticationError => "Authentication with Garmin Connect failed",
            Self::RateLimitError => "Garmin Connect rate limit exceeded",
            Self::NotFound => "The requested resource was not found",
            Self::InsufficientData => "Not enough data to perform the analysis",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Whether the caller can fix the failure by changing the arguments
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCursor | Self::InvalidArgument | Self::InvalidTimeRange
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Unified error type for the server
#[derive(Debug, ThisError)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Hints rendered alongside the message in error envelopes
    pub suggestions: Vec<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Attach a hint for the caller
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Envelope `kind` tag for this error
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.code.kind()
    }

    /// Malformed or tampered pagination cursor
    #[must_use]
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCursor, message).with_suggestion(
            "Pass the cursor exactly as returned, or omit it to start from the first page",
        )
    }

    /// Missing or out-of-range argument
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Unparseable period expression; the message carries the original text
    #[must_use]
    pub fn invalid_time_range(period: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidTimeRange,
            format!("Invalid time range '{period}': {reason}"),
        )
        .with_suggestion(
            "Use '7d', 'today', 'yesterday', 'this-week', 'last-week', 'this-month', \
             'last-month', 'this-year', 'YYYY-MM-DD' or 'YYYY-MM-DD:YYYY-MM-DD'",
        )
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Credentials missing, expired, or rejected
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthenticationError, message)
    }

    /// Analysis needs more data than was available
    #[must_use]
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientData, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let app_error = Self::new(code, message);
        let app_error = match code {
            ErrorCode::AuthenticationError => app_error.with_suggestion(
                "Run the Garmin authentication setup again to refresh the stored tokens",
            ),
            ErrorCode::RateLimitError => {
                app_error.with_suggestion("Wait a few minutes before retrying")
            }
            _ => app_error,
        };
        app_error.with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {error}")).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_kinds() {
        assert_eq!(ErrorCode::InvalidCursor.kind(), "invalid_cursor");
        assert_eq!(ErrorCode::InvalidTimeRange.kind(), "invalid_time_range");
        assert_eq!(ErrorCode::RateLimitError.kind(), "rate_limit_error");
        assert_eq!(ErrorCode::NotFound.kind(), "not_found");
    }

    #[test]
    fn test_caller_errors() {
        assert!(ErrorCode::InvalidArgument.is_caller_error());
        assert!(!ErrorCode::ApiError.is_caller_error());
    }

    #[test]
    fn test_provider_error_conversion_keeps_kind() {
        let error: AppError = ProviderError::RateLimit {
            provider: "garmin".to_owned(),
            retry_after_secs: Some(60),
        }
        .into();

        assert_eq!(error.code, ErrorCode::RateLimitError);
        assert!(!error.suggestions.is_empty());
        assert!(error.source.is_some());
    }

    #[test]
    fn test_invalid_time_range_carries_period() {
        let error = AppError::invalid_time_range("fortnight", "unrecognized period");
        assert!(error.message.contains("fortnight"));
        assert_eq!(error.kind(), "invalid_time_range");
    }
}
