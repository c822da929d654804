// ABOUTME: Argument extraction helpers and the QueryIntent classification shared by all tools
// ABOUTME: Turns loosely-typed JSON arguments into typed values before any Garmin call is made
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Parameters
//!
//! Callers send whatever the model produced: ids as numbers or strings,
//! dates as `today` or `2024-01-15`, periods as `7d`. Everything is parsed
//! here so tool bodies only see typed values.
//!
//! Flexible queries are classified into a [`QueryIntent`] up front. A cursor
//! always wins because it already carries the filters of the original query.

use chrono::NaiveDate;
use garmin_core::pagination::{decode_cursor, PageCursor};
use garmin_core::time_range::{parse_date, parse_time_range, range_from_dates, TimeRange};
use garmin_core::units::UnitSystem;
use serde_json::Value;

use crate::config::ToolConfig;
use crate::errors::{AppError, AppResult};

use super::errors::ToolError;

/// Non-empty string argument
#[must_use]
pub fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Unsigned integer argument given as a JSON number or a numeric string
///
/// # Errors
///
/// Returns `InvalidParameter` when the value is present but not a
/// non-negative integer
pub fn optional_u64(args: &Value, key: &str) -> Result<Option<u64>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| ToolError::invalid_parameter(key, "must be a non-negative integer")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ToolError::invalid_parameter(key, format!("'{s}' is not an integer"))),
        Some(_) => Err(ToolError::invalid_parameter(key, "must be an integer")),
    }
}

/// Like [`optional_u64`], narrowed to `u32`
///
/// # Errors
///
/// Returns `InvalidParameter` for non-integers and values above `u32::MAX`
pub fn optional_u32(args: &Value, key: &str) -> Result<Option<u32>, ToolError> {
    optional_u64(args, key)?
        .map(|value| {
            u32::try_from(value).map_err(|_| ToolError::invalid_parameter(key, "is too large"))
        })
        .transpose()
}

/// Required id argument
///
/// # Errors
///
/// Returns `MissingParameter` or `InvalidParameter`
pub fn required_u64(args: &Value, key: &str) -> Result<u64, ToolError> {
    optional_u64(args, key)?.ok_or_else(|| ToolError::missing_parameter(key))
}

/// Boolean flag with a default; accepts `"true"`/`"false"` strings too
#[must_use]
pub fn optional_bool(args: &Value, key: &str, default: bool) -> bool {
    match args.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => default,
        },
        _ => default,
    }
}

/// Comma-separated list argument, also accepting a JSON array of strings or numbers
#[must_use]
pub fn string_list(args: &Value, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = match args.get(key)? {
        Value::String(s) => s
            .split(',')
            .map(|item| item.trim().to_lowercase())
            .filter(|item| !item.is_empty())
            .collect(),
        Value::Array(values) => values
            .iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map(|item| item.trim().to_lowercase())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => return None,
    };
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Unit system from `unit`, falling back to the configured default
///
/// # Errors
///
/// Returns `InvalidArgument` for anything other than `metric` or `imperial`
pub fn unit_system(args: &Value, config: &ToolConfig) -> AppResult<UnitSystem> {
    optional_str(args, "unit").map_or(Ok(config.unit_system), str::parse::<UnitSystem>)
}

/// Page size from `limit`, clamped to the configured bounds
///
/// # Errors
///
/// Returns `InvalidArgument` when `limit` is not an integer
pub fn page_limit(args: &Value, config: &ToolConfig) -> AppResult<u32> {
    Ok(config.clamp_limit(optional_u32(args, "limit")?))
}

/// Decode the `cursor` argument if one was supplied
///
/// # Errors
///
/// Returns `InvalidCursor` for malformed or tampered tokens
pub fn cursor(args: &Value) -> AppResult<Option<PageCursor>> {
    optional_str(args, "cursor").map(decode_cursor).transpose()
}

/// Resolve `period`, or `start_date`+`end_date`, into a range
///
/// Returns `Ok(None)` when neither form is present.
///
/// # Errors
///
/// Returns `InvalidTimeRange` for unparseable periods and `InvalidArgument`
/// when only one of `start_date`/`end_date` is given
pub fn time_range(args: &Value, today: NaiveDate) -> AppResult<Option<TimeRange>> {
    if let Some(period) = optional_str(args, "period") {
        return parse_time_range(period, today).map(Some);
    }
    match (
        optional_str(args, "start_date"),
        optional_str(args, "end_date"),
    ) {
        (Some(start), Some(end)) => range_from_dates(start, end, today).map(Some),
        (Some(_), None) => Err(ToolError::missing_parameter("end_date").into()),
        (None, Some(_)) => Err(ToolError::missing_parameter("start_date").into()),
        (None, None) => Ok(None),
    }
}

/// Like [`time_range`], falling back to `default_period`
///
/// # Errors
///
/// Same as [`time_range`]
pub fn time_range_or(args: &Value, today: NaiveDate, default_period: &str) -> AppResult<TimeRange> {
    match time_range(args, today)? {
        Some(range) => Ok(range),
        None => parse_time_range(default_period, today),
    }
}

/// Single date from `date`, defaulting to today
///
/// # Errors
///
/// Returns `InvalidArgument` for anything other than `today`, `yesterday`
/// or `YYYY-MM-DD`
pub fn date_or_today(args: &Value, today: NaiveDate) -> AppResult<NaiveDate> {
    optional_str(args, "date").map_or(Ok(today), |value| parse_date(value, today))
}

/// What a flexible query is asking for
#[derive(Debug, Clone, PartialEq)]
pub enum QueryIntent {
    /// One record by id
    ById(u64),
    /// Everything on one calendar date
    ByDate(NaiveDate),
    /// Everything inside a date range
    ByRange(TimeRange),
    /// Newest records, no date bounds
    Recent,
    /// Next page of an earlier query
    Continuation(PageCursor),
}

impl QueryIntent {
    /// Classify tool arguments
    ///
    /// Precedence: `cursor`, `activity_id`, `date`, `period` or
    /// `start_date`+`end_date`, then recent.
    ///
    /// # Errors
    ///
    /// Propagates cursor, id, date, and range parse failures; nothing is
    /// fetched when classification fails
    pub fn from_args(args: &Value, today: NaiveDate) -> AppResult<Self> {
        if let Some(page) = cursor(args)? {
            return Ok(Self::Continuation(page));
        }
        if let Some(id) = optional_u64(args, "activity_id")? {
            return Ok(Self::ById(id));
        }
        if let Some(value) = optional_str(args, "date") {
            return parse_date(value, today).map(Self::ByDate);
        }
        Ok(time_range(args, today)?.map_or(Self::Recent, Self::ByRange))
    }

    /// Short label for logs and metadata
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ById(_) => "by_id",
            Self::ByDate(_) => "by_date",
            Self::ByRange(_) => "by_range",
            Self::Recent => "recent",
            Self::Continuation(_) => "continuation",
        }
    }
}

/// Reject an argument combination that cannot be served
#[must_use]
pub fn unsupported(message: &str, suggestions: &[&str]) -> AppError {
    suggestions
        .iter()
        .fold(AppError::invalid_argument(message), |error, suggestion| {
            error.with_suggestion(*suggestion)
        })
}
