//! Exponential moving average updates of topic scores.

use crate::classifier::UnknownInteractionPolicy;
use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::locks::TopicLocks;
use crate::store::TopicStore;
use crate::types::{normalize_tags, InteractionEvent, TopicScoreRecord};
use chrono::Utc;
use tracing::{debug, warn};

/// One EMA step: `alpha * weight + (1 - alpha) * current`, clamped to `[0, 1]`.
pub fn next_score(current: f64, weight: f64, alpha: f64) -> f64 {
    (alpha * weight + (1.0 - alpha) * current).clamp(0.0, 1.0)
}

/// Applies interaction events to the topic store.
pub struct EmaUpdater<'a> {
    store: &'a dyn TopicStore,
    locks: &'a TopicLocks,
    config: &'a ScoringConfig,
}

impl<'a> EmaUpdater<'a> {
    pub fn new(store: &'a dyn TopicStore, locks: &'a TopicLocks, config: &'a ScoringConfig) -> Self {
        Self {
            store,
            locks,
            config,
        }
    }

    /// Update every tag's score for `event` and return the written records.
    ///
    /// All tags are read and written in one store batch: either every topic
    /// reflects the event or none does, and no concurrent writer can slip in
    /// between the read and the write. The archived flag is left as stored.
    /// An empty tag set touches nothing.
    pub async fn apply(&self, event: &InteractionEvent) -> Result<Vec<TopicScoreRecord>> {
        let tags = normalize_tags(&event.tags);
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let kind = &event.interaction_type;
        if !kind.is_known() {
            warn!(
                content_id = %event.content_id,
                interaction = %kind,
                policy = ?self.config.unknown_interactions,
                "unknown interaction type"
            );
            match self.config.unknown_interactions {
                UnknownInteractionPolicy::Count => {}
                UnknownInteractionPolicy::Ignore => return Ok(Vec::new()),
                UnknownInteractionPolicy::Reject => {
                    return Err(ScoringError::Validation(format!(
                        "unknown interaction type: {kind}"
                    )))
                }
            }
        }

        let weight = kind.weight();
        let alpha = self.config.alpha;

        let neutral = self.config.neutral_score;
        let now = Utc::now();

        let _guards = self.locks.lock_all(&tags).await;
        let updated = self
            .store
            .update_topics(&tags, &|existing| {
                tags.iter()
                    .map(|tag| {
                        let (current, count) = match existing.get(tag) {
                            Some(r) => (r.score, r.interaction_count),
                            None => (neutral, 0),
                        };
                        let score = next_score(current, weight, alpha);
                        debug!(topic = %tag, from = current, to = score, weight, "topic score updated");
                        TopicScoreRecord {
                            topic: tag.clone(),
                            score,
                            interaction_count: count + 1,
                            last_updated: now,
                            archived: false,
                        }
                    })
                    .collect()
            })
            .await?;

        Ok(updated)
    }
}
