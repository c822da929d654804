// ABOUTME: Module containing all MCP tool implementations organized by category.
// ABOUTME: Each submodule corresponds to a tool category with feature flag support.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Implementations
//!
//! This module contains all MCP tool implementations, organized by category:
//!
//! - `activities` - Activity search, lookup, and details
//! - `analysis` - Period analysis, comparison, and similarity
//! - `health` - Daily wellness metrics, steps, and women's health
//! - `body` - Weigh-ins, blood pressure, and body composition
//! - `training` - Performance metrics, training effect, training status
//! - `records` - Personal records, race predictions, goals, badges and challenges
//! - `workouts` - Saved workouts
//! - `profile` - User profile, devices, gear
//!
//! Each category is conditionally compiled based on feature flags,
//! allowing for reduced binary size in deployments that don't need all tools.

use serde_json::Value;

// Activity tools: query_activities, get_activity_details
#[cfg(feature = "tools-activities")]
pub mod activities;

// Analysis tools: analyze_training_period, compare_activities, find_similar_activities
#[cfg(feature = "tools-analysis")]
pub mod analysis;

// Health tools: get_daily_health, get_daily_steps, get_womens_health
#[cfg(feature = "tools-health")]
pub mod health;

// Body tools: query_weigh_ins, query_blood_pressure, get_body_composition
#[cfg(feature = "tools-health")]
pub mod body;

// Training tools: get_performance_metrics, get_training_effect, get_training_status
#[cfg(feature = "tools-training")]
pub mod training;

// Record tools: get_personal_records, get_race_predictions, get_goals,
// get_badges_and_challenges
#[cfg(feature = "tools-training")]
pub mod records;

// Workout tools: get_workouts
#[cfg(feature = "tools-training")]
pub mod workouts;

// Profile tools: get_user_profile, get_devices, get_gear
#[cfg(feature = "tools-profile")]
pub mod profile;

/// Upstream list payloads come back as arrays; anything else is treated as empty
#[must_use]
pub fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}
