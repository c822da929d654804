// ABOUTME: Defines ToolResult, the rendered envelope a tool hands back to the protocol layer.
// ABOUTME: Carries the compact JSON text and whether it is an error envelope.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use garmin_core::envelope::error_response_from;
use serde_json::Value;

use crate::errors::AppError;
use crate::mcp::schema::{Content, ToolResponse};

/// Result returned by tool execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Rendered envelope JSON
    pub content: String,
    /// Whether `content` is an error envelope
    pub is_error: bool,
}

impl ToolResult {
    /// Wrap a rendered success envelope
    #[must_use]
    pub const fn ok(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Render an error as an error envelope
    #[must_use]
    pub fn from_error(error: &AppError) -> Self {
        Self {
            content: error_response_from(error),
            is_error: true,
        }
    }

    /// Parse the envelope back into JSON
    ///
    /// # Errors
    ///
    /// Returns the parse error if the content is not JSON
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.content)
    }
}

impl From<ToolResult> for ToolResponse {
    fn from(result: ToolResult) -> Self {
        Self {
            content: vec![Content::Text {
                text: result.content,
            }],
            is_error: result.is_error,
        }
    }
}
