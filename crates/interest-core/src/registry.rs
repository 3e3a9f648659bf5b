//! Registration of newly seen topics at the neutral prior.

use crate::error::Result;
use crate::store::TopicStore;
use crate::types::{normalize_tags, TopicScoreRecord};
use chrono::Utc;
use tracing::info;

/// Make sure every tag has a record, without disturbing existing ones.
///
/// Returns the number of topics actually created. Concurrent registration of
/// the same topic is resolved by the store's insert-if-absent, so a lost race
/// counts as "already there".
pub async fn register_tags<S: AsRef<str>>(
    store: &dyn TopicStore,
    tags: &[S],
    neutral_score: f64,
) -> Result<usize> {
    let tags = normalize_tags(tags);
    if tags.is_empty() {
        return Ok(0);
    }

    let existing = store.read_topics(&tags).await?;
    let now = Utc::now();
    let missing: Vec<TopicScoreRecord> = tags
        .iter()
        .filter(|t| !existing.contains_key(*t))
        .map(|t| TopicScoreRecord {
            score: neutral_score,
            ..TopicScoreRecord::neutral(t, now)
        })
        .collect();

    if missing.is_empty() {
        return Ok(0);
    }

    let created = store.insert_missing(&missing).await?;
    if created > 0 {
        info!(created, requested = tags.len(), "registered new topics");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTopicStore;

    #[tokio::test]
    async fn registers_only_missing_topics() {
        let mut rec = TopicScoreRecord::neutral("rust", Utc::now());
        rec.score = 0.8;
        rec.interaction_count = 5;
        let store = MemoryTopicStore::with_records([rec]);

        let created = register_tags(&store, &["rust", " llm ", "llm", ""], 0.5)
            .await
            .unwrap();
        assert_eq!(created, 1);

        let rust = store.get("rust").unwrap();
        assert_eq!(rust.score, 0.8);
        assert_eq!(rust.interaction_count, 5);
        let llm = store.get("llm").unwrap();
        assert_eq!(llm.score, 0.5);
        assert_eq!(llm.interaction_count, 0);
    }

    #[tokio::test]
    async fn registration_is_idempotent() {
        let store = MemoryTopicStore::new();
        assert_eq!(register_tags(&store, &["a", "b"], 0.5).await.unwrap(), 2);
        let before = store.get("a").unwrap();
        assert_eq!(register_tags(&store, &["a", "b"], 0.5).await.unwrap(), 0);
        assert_eq!(store.get("a").unwrap(), before);
    }

    #[tokio::test]
    async fn empty_list_touches_nothing() {
        let store = MemoryTopicStore::new();
        let none: [&str; 0] = [];
        assert_eq!(register_tags(&store, &none, 0.5).await.unwrap(), 0);
        assert!(store.is_empty());
    }
}
