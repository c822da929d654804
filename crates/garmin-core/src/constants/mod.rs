// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for error kinds, limits, unit conversion, and protocol identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Protocol version and server identification
pub mod protocol;

/// Machine-readable error kind tags written into error envelopes
pub mod error_kinds {
    /// Pagination cursor could not be decoded
    pub const INVALID_CURSOR: &str = "invalid_cursor";
    /// Tool argument missing or out of range
    pub const INVALID_ARGUMENT: &str = "invalid_argument";
    /// Period expression could not be parsed
    pub const INVALID_TIME_RANGE: &str = "invalid_time_range";
    /// Generic remote API failure
    pub const API_ERROR: &str = "api_error";
    /// Credentials missing, expired, or rejected
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    /// Upstream throttling
    pub const RATE_LIMIT_ERROR: &str = "rate_limit_error";
    /// Record does not exist upstream
    pub const NOT_FOUND: &str = "not_found";
    /// Not enough data for an analysis
    pub const INSUFFICIENT_DATA: &str = "insufficient_data";
    /// Configuration failure
    pub const CONFIG_ERROR: &str = "config_error";
    /// Unexpected internal failure
    pub const INTERNAL_ERROR: &str = "internal_error";
    /// Default kind for error envelopes built without a specific tag
    pub const GENERIC: &str = "error";
}

/// Provider identifiers
pub mod providers {
    /// Garmin Connect
    pub const GARMIN: &str = "garmin";
}

/// Pagination and query limits
pub mod limits {
    /// Default page size for list tools
    pub const DEFAULT_PAGE_LIMIT: u32 = 20;
    /// Upper bound accepted for `limit`
    pub const MAX_PAGE_LIMIT: u32 = 100;
    /// Default page size when paginating over days
    pub const DEFAULT_DAY_PAGE_LIMIT: u32 = 7;
    /// Upper bound of days fetched per page
    pub const MAX_DAY_PAGE_LIMIT: u32 = 31;
    /// Smallest number of activities `compare_activities` accepts
    pub const MIN_COMPARE_ACTIVITIES: usize = 2;
    /// Largest number of activities `compare_activities` accepts
    pub const MAX_COMPARE_ACTIVITIES: usize = 5;
    /// Default number of similar activities returned
    pub const DEFAULT_SIMILAR_LIMIT: u32 = 10;
    /// Largest number of similar activities returned
    pub const MAX_SIMILAR_LIMIT: u32 = 20;
    /// Recent activities scanned when searching for similar ones
    pub const SIMILARITY_CANDIDATE_POOL: u32 = 100;
    /// Upper bound of activities pulled for a period analysis
    pub const MAX_PERIOD_ACTIVITIES: u32 = 1000;
}

/// Unit conversion factors
pub mod units {
    /// Meters in a kilometer
    pub const METERS_PER_KILOMETER: f64 = 1000.0;
    /// Meters in a statute mile
    pub const METERS_PER_MILE: f64 = 1609.34;
    /// Feet in a meter
    pub const FEET_PER_METER: f64 = 3.280_84;
    /// Meters per second to kilometers per hour
    pub const MPS_TO_KMH: f64 = 3.6;
    /// Meters per second to miles per hour
    pub const MPS_TO_MPH: f64 = 2.236_94;
    /// Grams in a kilogram
    pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;
    /// Grams in a pound
    pub const GRAMS_PER_POUND: f64 = 453.592;
}
