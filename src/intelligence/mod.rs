// ABOUTME: Analysis routines that turn raw Garmin payloads into aggregates, comparisons, and insights
// ABOUTME: Pure functions over JSON and typed summaries; no API access happens here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Everything that derives numbers or insight strings from fetched data.
//! Tools fetch, these modules compute, and the envelope builder renders.

/// Typed activity view and field extraction
pub mod activity;
/// Side-by-side activity comparison
pub mod comparison;
/// Similar-activity scoring
pub mod similarity;
/// Period totals, type breakdown, and weekly trends
pub mod training_period;
/// Daily wellness compaction and insights
pub mod wellness;

pub use activity::{activity_type_key, training_effect, ActivitySummary};
pub use comparison::{compare_activities, ActivityComparison};
pub use similarity::{
    find_similar, parse_criteria, similarity_insights, SimilarMatch, SimilarityCriterion,
};
pub use training_period::TrainingPeriodAnalysis;
pub use wellness::{BloodPressureReading, StepDay, WeighIn};
