//! Tunables for the scoring engine.

use crate::classifier::UnknownInteractionPolicy;
use crate::error::{Result, ScoringError};
use crate::types::NEUTRAL_SCORE;
use serde::{Deserialize, Serialize};

/// Top-level scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// EMA smoothing constant: share of the newest reaction in the new score.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Prior for topics without a record.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,
    #[serde(default)]
    pub composite: CompositeWeights,
    #[serde(default)]
    pub serendipity: SerendipityConfig,
    #[serde(default)]
    pub unknown_interactions: UnknownInteractionPolicy,
}

/// Weights blending the three channel signals. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CompositeWeights {
    #[serde(default = "default_relevance_weight")]
    pub relevance: f64,
    #[serde(default = "default_context_weight")]
    pub context_match: f64,
    #[serde(default = "default_recency_weight")]
    pub recency: f64,
}

/// Exploration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerendipityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Channel label marking an item as a serendipity pick.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Added to `1 - mean interest`.
    #[serde(default = "default_boost")]
    pub boost: f64,
    /// Lowest weight any item can get.
    #[serde(default = "default_floor")]
    pub floor: f64,
}

fn default_alpha() -> f64 {
    0.3
}
fn default_neutral_score() -> f64 {
    NEUTRAL_SCORE
}
fn default_relevance_weight() -> f64 {
    0.6
}
fn default_context_weight() -> f64 {
    0.3
}
fn default_recency_weight() -> f64 {
    0.1
}
fn default_true() -> bool {
    true
}
fn default_channel() -> String {
    "serendipity".to_string()
}
fn default_boost() -> f64 {
    0.2
}
fn default_floor() -> f64 {
    0.2
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            neutral_score: default_neutral_score(),
            composite: CompositeWeights::default(),
            serendipity: SerendipityConfig::default(),
            unknown_interactions: UnknownInteractionPolicy::default(),
        }
    }
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            relevance: default_relevance_weight(),
            context_match: default_context_weight(),
            recency: default_recency_weight(),
        }
    }
}

impl Default for SerendipityConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            channel: default_channel(),
            boost: default_boost(),
            floor: default_floor(),
        }
    }
}

impl CompositeWeights {
    pub fn sum(&self) -> f64 {
        self.relevance + self.context_match + self.recency
    }
}

impl ScoringConfig {
    /// Reject values that would break the score bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ScoringError::Validation(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.neutral_score) {
            return Err(ScoringError::Validation(format!(
                "neutral_score must be in [0, 1], got {}",
                self.neutral_score
            )));
        }
        let w = &self.composite;
        if [w.relevance, w.context_match, w.recency]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ScoringError::Validation(
                "composite weights must be finite and non-negative".to_string(),
            ));
        }
        if (w.sum() - 1.0).abs() > 1e-9 {
            return Err(ScoringError::Validation(format!(
                "composite weights must sum to 1.0, got {}",
                w.sum()
            )));
        }
        let sc = &self.serendipity;
        if !(sc.floor.is_finite() && sc.floor > 0.0) || !sc.boost.is_finite() {
            return Err(ScoringError::Validation(
                "serendipity floor must be finite and positive, boost finite".to_string(),
            ));
        }
        if self.serendipity.channel.trim().is_empty() {
            return Err(ScoringError::Validation(
                "serendipity channel label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
