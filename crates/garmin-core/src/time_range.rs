// ABOUTME: Period expression grammar resolving strings like "7d" or "last-week" into date ranges
// ABOUTME: Supports relative day counts, named periods, absolute ranges, and single dates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Time Range Parsing
//!
//! Period expressions are matched case-insensitively, first match wins:
//!
//! | Form | Range | Description |
//! |---|---|---|
//! | `<N>d` | `today - N + 1 ..= today` | `Last N days` |
//! | `today`, `yesterday` | that day | `Today`, `Yesterday` |
//! | `this-week`, `last-week` | Monday-based weeks | `This week`, `Last week` |
//! | `this-month`, `last-month` | calendar months | `This month`, `Last month` |
//! | `this-year`, `ytd` | January 1st ..= today | `This year`, `Year to date` |
//! | `YYYY-MM-DD:YYYY-MM-DD` | as given | `2024-01-01 to 2024-01-31 (31 days)` |
//! | `YYYY-MM-DD` | that day | the date itself |
//!
//! A reversed absolute range is rejected rather than swapped.

use std::iter;

use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar date range with a human-readable description.
///
/// `start <= end` holds for every value produced by this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// First day of the range
    pub start: NaiveDate,
    /// Last day of the range (inclusive)
    pub end: NaiveDate,
    /// Human-readable rendering, e.g. `Last 7 days`
    pub description: String,
}

impl TimeRange {
    /// Number of calendar days covered, counting both ends
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Up to `take` dates walking back from `end`, after skipping the newest `skip`
    ///
    /// Only the requested window is materialized, so paging over a long range
    /// stays proportional to the page size.
    #[must_use]
    pub fn newest_dates(&self, skip: u32, take: u32) -> Vec<NaiveDate> {
        let Some(first) = self.end.checked_sub_days(Days::new(u64::from(skip))) else {
            return Vec::new();
        };
        iter::successors(Some(first), NaiveDate::pred_opt)
            .take_while(|date| *date >= self.start)
            .take(take as usize)
            .collect()
    }

    /// Start date as `YYYY-MM-DD`
    #[must_use]
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date as `YYYY-MM-DD`
    #[must_use]
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Named relative periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedPeriod {
    /// The current day
    Today,
    /// The previous day
    Yesterday,
    /// Monday of this week through today
    ThisWeek,
    /// Monday through Sunday of the previous week
    LastWeek,
    /// First of this month through today
    ThisMonth,
    /// The whole previous calendar month
    LastMonth,
    /// January 1st through today
    ThisYear,
    /// Alias of `ThisYear` with its own label
    YearToDate,
}

impl NamedPeriod {
    /// Match a lowercase period keyword
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "this-week" => Some(Self::ThisWeek),
            "last-week" => Some(Self::LastWeek),
            "this-month" => Some(Self::ThisMonth),
            "last-month" => Some(Self::LastMonth),
            "this-year" => Some(Self::ThisYear),
            "ytd" => Some(Self::YearToDate),
            _ => None,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This week",
            Self::LastWeek => "Last week",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
            Self::ThisYear => "This year",
            Self::YearToDate => "Year to date",
        }
    }

    /// Concrete bounds relative to `today`
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Today => (today, today),
            Self::Yesterday => {
                let yesterday = today - Duration::days(1);
                (yesterday, yesterday)
            }
            Self::ThisWeek => (week_start(today), today),
            Self::LastWeek => {
                let this_monday = week_start(today);
                (
                    this_monday - Duration::days(7),
                    this_monday - Duration::days(1),
                )
            }
            Self::ThisMonth => (month_start(today), today),
            Self::LastMonth => {
                let last_day = month_start(today) - Duration::days(1);
                (month_start(last_day), last_day)
            }
            Self::ThisYear | Self::YearToDate => (year_start(today), today),
        }
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

fn parse_day_count(text: &str) -> Option<&str> {
    text.strip_suffix('d')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Resolve a period expression into a concrete date range
///
/// # Errors
///
/// Returns `InvalidTimeRange`, carrying the original text, when the
/// expression matches no form, names an impossible date, spans zero days, or
/// is an absolute range whose start is after its end
pub fn parse_time_range(period: &str, today: NaiveDate) -> AppResult<TimeRange> {
    let normalized = period.trim().to_lowercase();

    if let Some(digits) = parse_day_count(&normalized) {
        let days: i64 = digits
            .parse()
            .map_err(|_| AppError::invalid_time_range(period, "day count is too large"))?;
        if days < 1 {
            return Err(AppError::invalid_time_range(
                period,
                "day count must be at least 1",
            ));
        }
        let start = u64::try_from(days - 1)
            .ok()
            .and_then(|back| today.checked_sub_days(Days::new(back)))
            .ok_or_else(|| {
                AppError::invalid_time_range(period, "day count reaches before the calendar start")
            })?;
        return Ok(TimeRange {
            start,
            end: today,
            description: format!("Last {days} days"),
        });
    }

    if let Some(named) = NamedPeriod::parse(&normalized) {
        let (start, end) = named.resolve(today);
        return Ok(TimeRange {
            start,
            end,
            description: named.label().to_owned(),
        });
    }

    if let Some((start_text, end_text)) = normalized.split_once(':') {
        let start = parse_iso_date(start_text)
            .ok_or_else(|| AppError::invalid_time_range(period, "start date is not YYYY-MM-DD"))?;
        let end = parse_iso_date(end_text)
            .ok_or_else(|| AppError::invalid_time_range(period, "end date is not YYYY-MM-DD"))?;
        if start > end {
            return Err(AppError::invalid_time_range(
                period,
                format!("start date {start} is after end date {end}"),
            ));
        }
        let days = (end - start).num_days() + 1;
        return Ok(TimeRange {
            start,
            end,
            description: format!("{start} to {end} ({days} days)"),
        });
    }

    if let Some(date) = parse_iso_date(&normalized) {
        return Ok(TimeRange {
            start: date,
            end: date,
            description: date.format(DATE_FORMAT).to_string(),
        });
    }

    Err(AppError::invalid_time_range(
        period,
        "unrecognized period expression",
    ))
}

/// Human-readable description of a period expression
///
/// Falls back to the raw text when the expression cannot be parsed, so this
/// never fails.
#[must_use]
pub fn get_range_description(period: &str, today: NaiveDate) -> String {
    parse_time_range(period, today).map_or_else(|_| period.to_owned(), |range| range.description)
}

/// Build a range from explicit start and end dates
///
/// # Errors
///
/// Returns `InvalidTimeRange` when either date is malformed or `start > end`
pub fn range_from_dates(start: &str, end: &str, today: NaiveDate) -> AppResult<TimeRange> {
    parse_time_range(&format!("{}:{}", start.trim(), end.trim()), today)
}

/// Parse a single-date argument accepting `today`, `yesterday`, or `YYYY-MM-DD`
///
/// # Errors
///
/// Returns `InvalidArgument` for anything else
pub fn parse_date(value: &str, today: NaiveDate) -> AppResult<NaiveDate> {
    let normalized = value.trim().to_lowercase();
    match normalized.as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        _ => parse_iso_date(&normalized).ok_or_else(|| {
            AppError::invalid_argument(format!(
                "Invalid date '{value}': expected 'today', 'yesterday' or YYYY-MM-DD"
            ))
        }),
    }
}

/// Split a range into Monday-to-Sunday weeks clamped to the range bounds
#[must_use]
pub fn week_ranges(range: &TimeRange) -> Vec<(NaiveDate, NaiveDate)> {
    let mut weeks = Vec::new();
    let mut current = range.start;
    while current <= range.end {
        let days_to_sunday = 6 - i64::from(current.weekday().num_days_from_monday());
        let week_end = (current + Duration::days(days_to_sunday)).min(range.end);
        weeks.push((current, week_end));
        current = week_end + Duration::days(1);
    }
    weeks
}
