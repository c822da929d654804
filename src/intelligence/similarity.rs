// ABOUTME: Scores candidate activities against a reference by type, distance, elevation, and duration
// ABOUTME: Tolerance matches earn partial credit; candidates above the threshold are ranked by score

use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::errors::AppError;

use super::activity::ActivitySummary;

/// Minimum similarity for a candidate to be reported
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// One way two activities can be alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityCriterion {
    /// Same `activityType.typeKey`
    Type,
    /// Distance within 20 %
    Distance,
    /// Elevation gain within 30 %
    Elevation,
    /// Duration within 20 %
    Duration,
}

impl SimilarityCriterion {
    /// Argument spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Distance => "distance",
            Self::Elevation => "elevation",
            Self::Duration => "duration",
        }
    }

    /// Allowed deviation in percent for numeric criteria
    #[must_use]
    pub const fn tolerance_percent(self) -> f64 {
        match self {
            Self::Type => 0.0,
            Self::Distance | Self::Duration => 20.0,
            Self::Elevation => 30.0,
        }
    }
}

impl FromStr for SimilarityCriterion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "type" => Ok(Self::Type),
            "distance" => Ok(Self::Distance),
            "elevation" => Ok(Self::Elevation),
            "duration" => Ok(Self::Duration),
            other => Err(AppError::invalid_argument(format!(
                "Unknown similarity criterion '{other}'"
            ))),
        }
    }
}

/// Parse criteria names, dropping unknown ones and duplicates
///
/// # Errors
///
/// Returns `InvalidArgument` when no valid criterion remains
pub fn parse_criteria(names: &[String]) -> Result<Vec<SimilarityCriterion>, AppError> {
    let mut criteria = Vec::new();
    for criterion in names.iter().filter_map(|name| name.parse::<SimilarityCriterion>().ok()) {
        if !criteria.contains(&criterion) {
            criteria.push(criterion);
        }
    }
    if criteria.is_empty() {
        return Err(AppError::invalid_argument("No valid criteria specified")
            .with_suggestion("Valid criteria: type, distance, elevation, duration")
            .with_suggestion("Example: 'type,distance'"));
    }
    Ok(criteria)
}

/// A candidate that cleared the threshold
#[derive(Debug, Clone)]
pub struct SimilarMatch {
    /// Index of the candidate in the input slice
    pub index: usize,
    /// Score in `0..=1`, rounded to two decimals
    pub score: f64,
    /// Per-criterion differences
    pub differences: Value,
}

fn numeric_difference(
    criterion: SimilarityCriterion,
    reference: f64,
    candidate: f64,
    differences: &mut Map<String, Value>,
) -> f64 {
    let diff = (candidate - reference).abs();
    let diff_percent = diff * 100.0 / reference;
    let tolerance = criterion.tolerance_percent();
    let within = diff_percent <= tolerance;
    let diff_key = if criterion == SimilarityCriterion::Duration {
        "diff_seconds"
    } else {
        "diff_meters"
    };
    differences.insert(
        criterion.as_str().to_owned(),
        json!({
            diff_key: diff,
            "diff_percent": (diff_percent * 10.0).round() / 10.0,
            "within_tolerance": within,
        }),
    );
    if within {
        (diff_percent / tolerance).mul_add(-0.5, 1.0)
    } else {
        0.0
    }
}

/// Score one candidate; `None` for the reference activity itself
#[must_use]
pub fn score_candidate(
    reference: &ActivitySummary,
    candidate: &ActivitySummary,
    criteria: &[SimilarityCriterion],
) -> Option<(f64, Value)> {
    if reference.id.is_some() && candidate.id == reference.id {
        return None;
    }

    let mut score = 0.0;
    let mut differences = Map::new();
    for criterion in criteria {
        match criterion {
            SimilarityCriterion::Type => {
                if candidate.type_key == reference.type_key {
                    score += 1.0;
                    differences.insert("type".to_owned(), json!({"match": true}));
                } else {
                    differences.insert(
                        "type".to_owned(),
                        json!({
                            "match": false,
                            "reference": reference.type_key,
                            "activity": candidate.type_key,
                        }),
                    );
                }
            }
            SimilarityCriterion::Distance if reference.distance > 0.0 => {
                score += numeric_difference(
                    *criterion,
                    reference.distance,
                    candidate.distance,
                    &mut differences,
                );
            }
            SimilarityCriterion::Elevation if reference.elevation_gain > 0.0 => {
                score += numeric_difference(
                    *criterion,
                    reference.elevation_gain,
                    candidate.elevation_gain,
                    &mut differences,
                );
            }
            SimilarityCriterion::Duration if reference.duration > 0.0 => {
                score += numeric_difference(
                    *criterion,
                    reference.duration,
                    candidate.duration,
                    &mut differences,
                );
            }
            // reference has no value for this metric; it still counts toward the maximum
            _ => {}
        }
    }

    #[allow(clippy::cast_precision_loss)] // Safe: at most four criteria
    let normalized = score / criteria.len().max(1) as f64;
    Some(((normalized * 100.0).round() / 100.0, Value::Object(differences)))
}

/// Rank candidates by similarity, keeping at most `limit` above the threshold
#[must_use]
pub fn find_similar(
    reference: &ActivitySummary,
    candidates: &[ActivitySummary],
    criteria: &[SimilarityCriterion],
    limit: usize,
) -> Vec<SimilarMatch> {
    let mut matches: Vec<SimilarMatch> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let (score, differences) = score_candidate(reference, candidate, criteria)?;
            (score > SIMILARITY_THRESHOLD).then_some(SimilarMatch {
                index,
                score,
                differences,
            })
        })
        .collect();
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(limit);
    matches
}

/// Count, average score, and match quality insights
#[must_use]
pub fn similarity_insights(matches: &[SimilarMatch]) -> Vec<String> {
    let Some(top) = matches.first() else {
        return vec!["No similar activities found matching the criteria".to_owned()];
    };
    #[allow(clippy::cast_precision_loss)] // Safe: at most twenty matches
    let average = matches.iter().map(|m| m.score).sum::<f64>() / matches.len() as f64;
    let mut insights = vec![
        format!("Found {} similar activities", matches.len()),
        format!("Average similarity score: {average:.2}"),
    ];
    if top.score > 0.9 {
        insights.push("Very high similarity with top matches".to_owned());
    } else if top.score > 0.7 {
        insights.push("Good similarity with top matches".to_owned());
    }
    insights
}
