//! In-process store backed by a locked map.

use super::{StoreResult, TopicStore};
use crate::types::TopicScoreRecord;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Map-backed [`TopicStore`], used in tests and in the wasm build.
#[derive(Debug, Default)]
pub struct MemoryTopicStore {
    records: RwLock<HashMap<String, TopicScoreRecord>>,
}

impl MemoryTopicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_records(records: impl IntoIterator<Item = TopicScoreRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.topic.clone(), r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn get(&self, topic: &str) -> Option<TopicScoreRecord> {
        self.records.read().get(topic).cloned()
    }
}

fn write_batch(records: &mut HashMap<String, TopicScoreRecord>, batch: &[TopicScoreRecord]) {
    for record in batch {
        match records.get_mut(&record.topic) {
            Some(existing) => {
                let archived = existing.archived;
                *existing = record.clone();
                existing.archived = archived;
            }
            None => {
                records.insert(record.topic.clone(), record.clone());
            }
        }
    }
}

#[async_trait]
impl TopicStore for MemoryTopicStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read_topics(&self, topics: &[String]) -> StoreResult<HashMap<String, TopicScoreRecord>> {
        let records = self.records.read();
        Ok(topics
            .iter()
            .filter_map(|t| records.get(t).map(|r| (t.clone(), r.clone())))
            .collect())
    }

    async fn upsert_topics(&self, batch: &[TopicScoreRecord]) -> StoreResult<()> {
        let mut records = self.records.write();
        write_batch(&mut records, batch);
        Ok(())
    }

    async fn update_topics(
        &self,
        topics: &[String],
        update: &(dyn for<'m> Fn(&'m HashMap<String, TopicScoreRecord>) -> Vec<TopicScoreRecord> + Send + Sync),
    ) -> StoreResult<Vec<TopicScoreRecord>> {
        let mut records = self.records.write();
        let current: HashMap<String, TopicScoreRecord> = topics
            .iter()
            .filter_map(|t| records.get(t).map(|r| (t.clone(), r.clone())))
            .collect();
        let updated = update(&current);
        write_batch(&mut records, &updated);
        Ok(updated
            .iter()
            .filter_map(|u| records.get(&u.topic).cloned())
            .collect())
    }

    async fn insert_missing(&self, batch: &[TopicScoreRecord]) -> StoreResult<usize> {
        let mut records = self.records.write();
        let mut created = 0;
        for record in batch {
            if !records.contains_key(&record.topic) {
                records.insert(record.topic.clone(), record.clone());
                created += 1;
            }
        }
        Ok(created)
    }

    async fn read_all_active(&self) -> StoreResult<Vec<TopicScoreRecord>> {
        let mut active: Vec<TopicScoreRecord> = self
            .records
            .read()
            .values()
            .filter(|r| !r.archived)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.topic.cmp(&b.topic));
        Ok(active)
    }

    async fn set_archived(&self, topic: &str, archived: bool) -> StoreResult<bool> {
        match self.records.write().get_mut(topic) {
            Some(record) => {
                record.archived = archived;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
