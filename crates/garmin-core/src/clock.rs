// ABOUTME: Injectable clock abstraction for "now" and "today"
// ABOUTME: SystemClock reads the host clock; FixedClock pins time for deterministic tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Debug;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};

/// Source of the current instant and calendar date.
///
/// Period expressions such as `7d` are relative to "today", which is always
/// read through this trait so tools can be exercised with a frozen date.
pub trait Clock: Send + Sync + Debug {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the user's local time zone
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the host system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// Freeze at an explicit instant; "today" is the UTC date of that instant
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            today: now.date_naive(),
        }
    }

    /// Freeze at noon UTC of the given date
    #[must_use]
    pub fn on_date(today: NaiveDate) -> Self {
        Self {
            now: today.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12),
            today,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
