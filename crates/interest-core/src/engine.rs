//! Entry point collaborators call: reactions in, scores out.

use crate::config::ScoringConfig;
use crate::ema::EmaUpdater;
use crate::error::{Result, ScoringError};
use crate::locks::TopicLocks;
use crate::registry;
use crate::serendipity::ReactionRecord;
use crate::store::TopicStore;
use crate::types::{normalize_tags, InteractionEvent, TopicScoreRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Owns the store handle, the scoring config and the per-topic locks.
///
/// Cheap to clone; clones share the same locks, so same-topic updates stay
/// serialized across every handle.
#[derive(Clone)]
pub struct InterestEngine {
    store: Arc<dyn TopicStore>,
    config: Arc<ScoringConfig>,
    locks: Arc<TopicLocks>,
}

impl InterestEngine {
    /// Build an engine, validating `config` first.
    pub fn new(store: Arc<dyn TopicStore>, config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config: Arc::new(config),
            locks: Arc::new(TopicLocks::default()),
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn TopicStore {
        self.store.as_ref()
    }

    /// Apply one reaction to every tagged topic.
    pub async fn apply_interaction(&self, event: &InteractionEvent) -> Result<Vec<TopicScoreRecord>> {
        debug!(
            store = self.store.name(),
            content_id = %event.content_id,
            interaction = %event.interaction_type,
            "applying interaction"
        );
        EmaUpdater::new(self.store.as_ref(), &self.locks, &self.config)
            .apply(event)
            .await
    }

    /// Apply a reaction and produce its audit record along with the topic
    /// records it wrote.
    ///
    /// `is_serendipity` comes from the item's channel assignment; it only
    /// changes the record, not the score update. No record is produced when
    /// the update fails.
    pub async fn apply_reaction(
        &self,
        event: &InteractionEvent,
        is_serendipity: bool,
    ) -> Result<(ReactionRecord, Vec<TopicScoreRecord>)> {
        let updated = self.apply_interaction(event).await?;
        Ok((ReactionRecord::for_event(event, is_serendipity), updated))
    }

    /// Register the tags of a newly ingested item at the neutral prior.
    pub async fn register_tags<S: AsRef<str> + Sync>(&self, tags: &[S]) -> Result<usize> {
        registry::register_tags(self.store.as_ref(), tags, self.config.neutral_score).await
    }

    /// Look up one topic, archived or not.
    pub async fn topic(&self, topic: &str) -> Result<TopicScoreRecord> {
        let key = normalize_tags(&[topic]);
        let found = self.store.read_topics(&key).await?;
        key.first()
            .and_then(|k| found.get(k).cloned())
            .ok_or_else(|| ScoringError::NotFound(topic.to_string()))
    }

    /// Active (non-archived) topic records.
    pub async fn active_topics(&self) -> Result<Vec<TopicScoreRecord>> {
        Ok(self.store.read_all_active().await?)
    }

    /// Topic score map for the pure scorers, archived topics excluded.
    pub async fn active_scores(&self) -> Result<HashMap<String, f64>> {
        Ok(self
            .active_topics()
            .await?
            .into_iter()
            .map(|r| (r.topic, r.score))
            .collect())
    }

    /// Soft-disable or restore a topic. Returns false if it does not exist.
    pub async fn set_archived(&self, topic: &str, archived: bool) -> Result<bool> {
        let key = topic.trim().to_string();
        let _guard = self.locks.lock_all(std::slice::from_ref(&key)).await;
        Ok(self.store.set_archived(&key, archived).await?)
    }
}
