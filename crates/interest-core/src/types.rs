//! Core types for interest tracking.

use crate::classifier::InteractionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score every topic starts from before the user has reacted to it.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Persisted interest state for a single topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicScoreRecord {
    /// Topic label, trimmed and case-sensitive. Unique per store.
    pub topic: String,
    /// Interest score, always within `[0.0, 1.0]`.
    pub score: f64,
    /// Number of EMA updates applied to this topic.
    #[serde(default)]
    pub interaction_count: u64,
    /// Time of the most recent write.
    pub last_updated: DateTime<Utc>,
    /// Soft-disabled topics keep their history but drop out of active ranking.
    #[serde(default)]
    pub archived: bool,
}

impl TopicScoreRecord {
    /// A freshly registered topic at the neutral prior.
    pub fn neutral(topic: &str, now: DateTime<Utc>) -> Self {
        Self {
            topic: topic.to_string(),
            score: NEUTRAL_SCORE,
            interaction_count: 0,
            last_updated: now,
            archived: false,
        }
    }
}

/// A single user reaction to a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionEvent {
    /// Opaque content identifier, never interpreted here.
    pub content_id: String,
    pub interaction_type: InteractionType,
    /// Topics of the reacted-to content. Normalized before use.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl InteractionEvent {
    pub fn new(content_id: &str, interaction_type: InteractionType, tags: &[&str]) -> Self {
        Self {
            content_id: content_id.to_string(),
            interaction_type,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Content item considered for a briefing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContentCandidate {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Channel label assigned during briefing assembly (e.g. "serendipity").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Externally supplied relevance. Falls back to the content score when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_match: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recency: Option<f64>,
}

/// Trim tags, drop empties and collapse duplicates. Case is preserved and
/// first-seen order is kept.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() || out.iter().any(|t| t == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}
