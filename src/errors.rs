// ABOUTME: Error types for the server crate, re-exported from garmin-core
// ABOUTME: Tools, resources and prompts all fail with AppError and render it as an error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! `AppError` carries an [`ErrorCode`] whose `kind()` becomes the envelope's
//! `error.kind`. Garmin client failures arrive as [`ProviderError`] and
//! convert through `From`.

pub use garmin_core::errors::{AppError, AppResult, ErrorCode, ProviderError};
