// ABOUTME: Core types and constants for the Garmin Connect MCP server
// ABOUTME: Foundation crate with error handling, pagination cursors, envelopes, and period parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Garmin Core
//!
//! Foundation crate providing the pure, synchronous building blocks of the
//! Garmin Connect MCP server. Nothing here performs I/O; every function is
//! safe to call from any number of concurrent tool invocations.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ProviderError`
//! - **constants**: Limits, error kind tags, and protocol constants
//! - **pagination**: Stateless cursor codec and page-boundary detection
//! - **envelope**: Uniform success and error response envelopes
//! - **time_range**: Period expression grammar (`7d`, `last-week`, `2024-01-01:2024-01-31`)
//! - **clock**: Injectable source of "now" for deterministic date handling
//! - **units**: Metric/imperial formatting of distances, paces, durations, and weights

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Stateless cursor-based pagination
pub mod pagination;

/// Success and error response envelopes
pub mod envelope;

/// Period expression parsing into concrete date ranges
pub mod time_range;

/// Clock abstraction for "today" and "now"
pub mod clock;

/// Unit conversion and human-readable formatting
pub mod units;
