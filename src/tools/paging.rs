// ABOUTME: Builds PageRequests for fresh queries and cursor continuations
// ABOUTME: Stores the page size in the cursor filters so a continuation keeps the original limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use garmin_core::constants::limits::{DEFAULT_DAY_PAGE_LIMIT, MAX_DAY_PAGE_LIMIT};
use garmin_core::pagination::{CursorFilters, FilterValue, PageCursor, PageRequest};
use garmin_core::time_range::TimeRange;
use serde_json::Value;

use crate::config::ToolConfig;
use crate::errors::{AppError, AppResult};

use super::params::{cursor, optional_u32, time_range_or};

/// Filter key holding the page size
pub const LIMIT_FILTER: &str = "limit";

/// First page of a query; `limit` is recorded in the filters
#[must_use]
pub fn first_page(limit: u32, mut filters: CursorFilters) -> PageRequest {
    filters.insert(LIMIT_FILTER.to_owned(), FilterValue::from(limit));
    PageRequest::first(limit, filters)
}

/// Continue from a cursor
///
/// A limit stored in the cursor wins over `fallback_limit`, clamped to the
/// configured bounds.
#[must_use]
pub fn resume_page(cursor: PageCursor, fallback_limit: u32, config: &ToolConfig) -> PageRequest {
    let limit = cursor
        .int(LIMIT_FILTER)
        .and_then(|stored| u32::try_from(stored).ok())
        .map_or(fallback_limit, |stored| config.clamp_limit(Some(stored)));
    PageRequest::resume(cursor, limit)
}

/// Text filter of a request
#[must_use]
pub fn text_filter<'a>(request: &'a PageRequest, key: &str) -> Option<&'a str> {
    request.filters.get(key).and_then(FilterValue::as_str)
}

/// Date filter of a request
///
/// # Errors
///
/// Returns `InvalidCursor` when the stored value is not `YYYY-MM-DD`
pub fn date_filter(request: &PageRequest, key: &str) -> AppResult<Option<NaiveDate>> {
    text_filter(request, key)
        .map(|text| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
                AppError::invalid_cursor(format!("Cursor filter '{key}' is not a date: {text}"))
            })
        })
        .transpose()
}

/// Store a range so a continuation can rebuild it
pub fn insert_range(filters: &mut CursorFilters, range: &TimeRange) {
    filters.insert("start_date".to_owned(), range.start.into());
    filters.insert("end_date".to_owned(), range.end.into());
    filters.insert(
        "period".to_owned(),
        FilterValue::from(range.description.as_str()),
    );
}

/// Rebuild the range stored by [`insert_range`]
///
/// # Errors
///
/// Returns `InvalidCursor` when either bound is missing or malformed
pub fn range_filter(request: &PageRequest) -> AppResult<TimeRange> {
    let (Some(start), Some(end)) = (
        date_filter(request, "start_date")?,
        date_filter(request, "end_date")?,
    ) else {
        return Err(AppError::invalid_cursor("Cursor does not carry a date range"));
    };
    if start > end {
        return Err(AppError::invalid_cursor("Cursor date range is reversed"));
    }
    let description = text_filter(request, "period")
        .map_or_else(|| format!("{start} to {end}"), str::to_owned);
    Ok(TimeRange {
        start,
        end,
        description,
    })
}

/// Days per page for day-paginated tools
///
/// # Errors
///
/// Returns `InvalidArgument` when `limit` is not between 1 and 31
pub fn day_limit(args: &Value) -> AppResult<u32> {
    match optional_u32(args, LIMIT_FILTER)? {
        None => Ok(DEFAULT_DAY_PAGE_LIMIT),
        Some(limit) if (1..=MAX_DAY_PAGE_LIMIT).contains(&limit) => Ok(limit),
        Some(limit) => Err(AppError::invalid_argument(format!(
            "limit must be between 1 and {MAX_DAY_PAGE_LIMIT} days, got {limit}"
        ))),
    }
}

/// Continue a day-paginated query; a stored limit wins
#[must_use]
pub fn resume_day_page(cursor: PageCursor, fallback_limit: u32) -> PageRequest {
    let limit = cursor
        .int(LIMIT_FILTER)
        .and_then(|stored| u32::try_from(stored).ok())
        .map_or(fallback_limit, |stored| stored.clamp(1, MAX_DAY_PAGE_LIMIT));
    PageRequest::resume(cursor, limit)
}

/// Page over the days of a range
///
/// A cursor resumes with its stored range; otherwise the range comes from
/// `period` or `start_date`+`end_date`, defaulting to `default_period`.
///
/// # Errors
///
/// Propagates cursor, limit, and range parse failures
pub fn day_range_page(
    args: &Value,
    today: NaiveDate,
    default_period: &str,
) -> AppResult<(PageRequest, TimeRange)> {
    let limit = day_limit(args)?;
    if let Some(cursor) = cursor(args)? {
        let request = resume_day_page(cursor, limit);
        let range = range_filter(&request)?;
        return Ok((request, range));
    }
    let range = time_range_or(args, today, default_period)?;
    let mut filters = CursorFilters::new();
    insert_range(&mut filters, &range);
    Ok((first_page(limit, filters), range))
}

/// Items of a page window, owned
#[must_use]
pub fn window_vec<T: Clone>(request: &PageRequest, items: &[T]) -> Vec<T> {
    request.window(items).to_vec()
}

#[cfg(test)]
mod tests {
    use garmin_core::pagination::{decode_cursor, encode_cursor};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cursor_limit_wins() {
        let config = ToolConfig::default();
        let first = first_page(10, CursorFilters::new());
        let token = encode_cursor(2, &first.filters).unwrap();
        let resumed = resume_page(decode_cursor(&token).unwrap(), 50, &config);
        assert_eq!(resumed.limit, 10);
        assert_eq!(resumed.page, 2);
        assert_eq!(resumed.offset(), 10);
    }

    #[test]
    fn test_day_range_survives_cursor() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let args = json!({"period": "30d", "limit": 7});
        let (first, range) = day_range_page(&args, today, "7d").unwrap();
        let token = encode_cursor(2, &first.filters).unwrap();

        let (resumed, resumed_range) =
            day_range_page(&json!({"cursor": token}), today, "7d").unwrap();
        assert_eq!(resumed_range, range);
        assert_eq!(resumed.limit, 7);
        assert_eq!(resumed.offset(), 7);
    }

    #[test]
    fn test_day_limit_bounds() {
        assert_eq!(day_limit(&json!({})).unwrap(), 7);
        assert!(day_limit(&json!({"limit": 0})).is_err());
        assert!(day_limit(&json!({"limit": 32})).is_err());
    }
}
