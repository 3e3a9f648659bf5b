//! Exploration weighting and serendipity reaction tracking.

use crate::classifier::InteractionType;
use crate::config::SerendipityConfig;
use crate::types::{normalize_tags, ContentCandidate, InteractionEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Source label attached to reactions on serendipity picks.
pub const SERENDIPITY_SOURCE: &str = "serendipity_channel";

/// Weight favoring content the user has shown little interest in.
///
/// Missing tags count as zero interest, so untagged or unseen content gets
/// the maximum `1 + boost`. Fully saturated interest bottoms out at `floor`,
/// never zero.
pub fn inverse_weight<S: AsRef<str>>(
    tags: &[S],
    topic_scores: &HashMap<String, f64>,
    config: &SerendipityConfig,
) -> f64 {
    let tags = normalize_tags(tags);
    let average_interest = if tags.is_empty() {
        0.0
    } else {
        let total: f64 = tags
            .iter()
            .map(|t| topic_scores.get(t).copied().unwrap_or(0.0))
            .sum();
        total / tags.len() as f64
    };
    (1.0 - average_interest + config.boost).max(config.floor)
}

/// Whether the briefing assembler put this item in the serendipity channel.
pub fn is_serendipitous(candidate: &ContentCandidate, config: &SerendipityConfig) -> bool {
    candidate.channel.as_deref() == Some(config.channel.as_str())
}

/// Audit metadata for one reaction. Lets analytics split exploration
/// reactions from mainstream ones; the score math is the same for both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionRecord {
    pub content_id: String,
    pub interaction_type: InteractionType,
    pub is_serendipity: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serendipity_source: Option<String>,
}

impl ReactionRecord {
    pub fn for_event(event: &InteractionEvent, is_serendipity: bool) -> Self {
        let record = Self {
            content_id: event.content_id.clone(),
            interaction_type: event.interaction_type.clone(),
            is_serendipity,
            serendipity_source: is_serendipity.then(|| SERENDIPITY_SOURCE.to_string()),
        };
        if is_serendipity {
            info!(
                target: "interest_core::serendipity",
                content_id = %record.content_id,
                interaction = %record.interaction_type,
                "serendipity reaction"
            );
        }
        record
    }
}
