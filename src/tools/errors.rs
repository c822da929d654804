// ABOUTME: Defines tool-specific error types for registry lookups and argument validation.
// ABOUTME: Converts into AppError so argument problems surface as invalid_argument envelopes.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::error::Error;
use std::fmt;

use crate::errors::AppError;

/// Errors specific to tool operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Tool was not found in the registry
    NotFound {
        /// Name of the requested tool
        tool_name: String,
    },
    /// Argument present but unusable
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason the parameter is invalid
        reason: String,
    },
    /// Required argument is missing
    MissingParameter {
        /// Name of the missing parameter
        parameter: String,
    },
}

impl ToolError {
    /// Create a "not found" error
    #[must_use]
    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::NotFound {
            tool_name: tool_name.into(),
        }
    }

    /// Create an "invalid parameter" error
    #[must_use]
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a "missing parameter" error
    #[must_use]
    pub fn missing_parameter(parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            parameter: parameter.into(),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { tool_name } => write!(f, "Unknown tool: {tool_name}"),
            Self::InvalidParameter { parameter, reason } => {
                write!(f, "Invalid parameter '{parameter}': {reason}")
            }
            Self::MissingParameter { parameter } => {
                write!(f, "Missing required parameter '{parameter}'")
            }
        }
    }
}

impl Error for ToolError {}

impl From<ToolError> for AppError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::NotFound { tool_name } => Self::not_found(format!("Tool '{tool_name}'")),
            other => Self::invalid_argument(other.to_string()),
        }
    }
}
