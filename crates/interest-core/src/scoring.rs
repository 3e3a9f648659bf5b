//! Relevance and composite channel scores.
//!
//! Pure functions over an already-fetched topic score map; no I/O.

use crate::config::CompositeWeights;
use crate::error::{Result, ScoringError};
use crate::types::{normalize_tags, NEUTRAL_SCORE};
use std::collections::HashMap;

/// Mean interest across `tags`, with unknown tags counting as neutral.
///
/// Untagged content scores exactly 0.5 so it is not penalized.
pub fn score_content<S: AsRef<str>>(tags: &[S], topic_scores: &HashMap<String, f64>) -> f64 {
    score_content_with_prior(tags, topic_scores, NEUTRAL_SCORE)
}

/// [`score_content`] with a custom prior for untagged content and unknown tags.
/// Pass the same value topics are registered at.
pub fn score_content_with_prior<S: AsRef<str>>(
    tags: &[S],
    topic_scores: &HashMap<String, f64>,
    prior: f64,
) -> f64 {
    let tags = normalize_tags(tags);
    if tags.is_empty() {
        return prior;
    }
    let total: f64 = tags
        .iter()
        .map(|t| topic_scores.get(t).copied().unwrap_or(prior))
        .sum();
    total / tags.len() as f64
}

/// Final ranking score for a channel item.
///
/// With both auxiliary signals present the three are blended by `weights`;
/// otherwise `relevance` passes through unchanged.
pub fn score_channel(
    relevance: f64,
    context_match: Option<f64>,
    recency: Option<f64>,
    weights: &CompositeWeights,
) -> f64 {
    match (context_match, recency) {
        (Some(context), Some(recency)) => (relevance * weights.relevance
            + context * weights.context_match
            + recency * weights.recency)
            .clamp(0.0, 1.0),
        _ => relevance,
    }
}

/// [`score_channel`] that rejects non-finite or out-of-range signals.
pub fn try_score_channel(
    relevance: f64,
    context_match: Option<f64>,
    recency: Option<f64>,
    weights: &CompositeWeights,
) -> Result<f64> {
    check_unit("relevance", relevance)?;
    if let Some(v) = context_match {
        check_unit("context_match", v)?;
    }
    if let Some(v) = recency {
        check_unit("recency", v)?;
    }
    Ok(score_channel(relevance, context_match, recency, weights))
}

fn check_unit(name: &str, v: f64) -> Result<()> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(ScoringError::Validation(format!(
            "{name} must be a finite value in [0, 1], got {v}"
        )))
    }
}
