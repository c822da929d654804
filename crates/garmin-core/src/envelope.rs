// ABOUTME: Uniform response envelopes for every tool output
// ABOUTME: Builds compact success {data, analysis, pagination, metadata} and error {error} JSON documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Response Envelopes
//!
//! Tools never hand-format their output. A success is rendered through
//! [`ResponseEnvelope`] (or [`build_response`]) and a failure through
//! [`build_error_response`], so every payload the model sees has one of two
//! shapes:
//!
//! ```json
//! {"data":{},"analysis":{"insights":[]},"pagination":{"has_more":false,"limit":20,"returned":3},"metadata":{"fetched_at":"2024-01-15T08:00:00.000Z"}}
//! {"error":{"message":"...","kind":"invalid_cursor"}}
//! ```
//!
//! Output is compact JSON. `metadata.fetched_at` is injected unless the
//! caller already supplied it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::error_kinds;
use crate::errors::AppError;
use crate::pagination::PaginationInfo;

/// Metadata key holding the fetch timestamp
pub const FETCHED_AT: &str = "fetched_at";

/// Analysis block attached to a successful response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Analysis {
    /// Human-readable observations about the data
    pub insights: Vec<String>,
}

/// Successful response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Primary payload
    pub data: Value,
    /// Optional insights derived from the payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    /// Pagination block for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
    /// Response metadata; always carries `fetched_at` once rendered
    pub metadata: Map<String, Value>,
}

impl ResponseEnvelope {
    /// Start an envelope around a payload
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self {
            data,
            analysis: None,
            pagination: None,
            metadata: Map::new(),
        }
    }

    /// Attach an analysis block
    #[must_use]
    pub fn with_analysis(mut self, analysis: Analysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Attach insights, skipping the analysis block when there are none
    #[must_use]
    pub fn with_insights(self, insights: Vec<String>) -> Self {
        if insights.is_empty() {
            self
        } else {
            self.with_analysis(Analysis { insights })
        }
    }

    /// Attach a pagination block
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Add a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Render with the current time as `fetched_at`
    #[must_use]
    pub fn render(self) -> String {
        self.render_at(Utc::now())
    }

    /// Render with an explicit `fetched_at` timestamp
    #[must_use]
    pub fn render_at(mut self, fetched_at: DateTime<Utc>) -> String {
        self.stamp(fetched_at);
        serde_json::to_string(&self).unwrap_or_else(|e| {
            build_error_response(
                &format!("Failed to serialize response: {e}"),
                error_kinds::INTERNAL_ERROR,
            )
        })
    }

    fn stamp(&mut self, fetched_at: DateTime<Utc>) {
        self.metadata
            .entry(FETCHED_AT)
            .or_insert_with(|| Value::String(format_timestamp(fetched_at)));
    }
}

/// Format a timestamp as ISO-8601 UTC with a `Z` suffix
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build a compact success envelope
///
/// Caller-supplied metadata keys are preserved; `fetched_at` is added only
/// when absent.
#[must_use]
pub fn build_response(
    data: Value,
    analysis: Option<Analysis>,
    pagination: Option<PaginationInfo>,
    metadata: Option<Map<String, Value>>,
) -> String {
    ResponseEnvelope {
        data,
        analysis,
        pagination,
        metadata: metadata.unwrap_or_default(),
    }
    .render()
}

/// Error half of the envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Machine-readable category tag
    pub kind: String,
    /// Optional hints for the caller
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Error response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Error details
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    /// Render as compact JSON
    #[must_use]
    pub fn render(&self) -> String {
        let mut body = json!({
            "message": self.error.message,
            "kind": self.error.kind,
        });
        if !self.error.suggestions.is_empty() {
            body["suggestions"] = json!(self.error.suggestions);
        }
        json!({ "error": body }).to_string()
    }
}

impl From<&AppError> for ErrorEnvelope {
    fn from(error: &AppError) -> Self {
        Self {
            error: ErrorBody {
                message: error.message.clone(),
                kind: error.kind().to_owned(),
                suggestions: error.suggestions.clone(),
            },
        }
    }
}

/// Build a compact error envelope; use [`error_kinds::GENERIC`] when no
/// specific kind applies
#[must_use]
pub fn build_error_response(message: &str, kind: &str) -> String {
    ErrorEnvelope {
        error: ErrorBody {
            message: message.to_owned(),
            kind: kind.to_owned(),
            suggestions: Vec::new(),
        },
    }
    .render()
}

/// Render an application error as an error envelope
#[must_use]
pub fn error_response_from(error: &AppError) -> String {
    ErrorEnvelope::from(error).render()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_fetched_at_not_overwritten() {
        let envelope = ResponseEnvelope::new(json!({"x": 1})).with_metadata("fetched_at", "keep");
        let rendered: Value = serde_json::from_str(&envelope.render()).unwrap();
        assert_eq!(rendered["metadata"]["fetched_at"], "keep");
    }

    #[test]
    fn test_render_at_uses_zulu_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        let rendered: Value =
            serde_json::from_str(&ResponseEnvelope::new(json!([])).render_at(at)).unwrap();
        assert_eq!(rendered["metadata"]["fetched_at"], "2024-01-15T08:30:00.000Z");
    }

    #[test]
    fn test_empty_insights_skip_analysis() {
        let rendered = ResponseEnvelope::new(json!({})).with_insights(Vec::new()).render();
        assert!(!rendered.contains("analysis"));
    }
}
