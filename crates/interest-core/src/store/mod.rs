//! Topic score persistence.
//!
//! The engine only talks to storage through [`TopicStore`]: keyed reads,
//! batch upserts, insert-if-absent and an atomic read-modify-write. Any
//! backend offering those with per-batch atomicity can sit behind it.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryTopicStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTopicStore;

use crate::error::StoreError;
use crate::types::TopicScoreRecord;
use async_trait::async_trait;
use std::collections::HashMap;

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed store of [`TopicScoreRecord`]s, unique on `topic`.
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Fetch the records that exist among `topics`. Missing topics are simply
    /// absent from the map. Archived records are included.
    async fn read_topics(&self, topics: &[String]) -> StoreResult<HashMap<String, TopicScoreRecord>>;

    /// Insert or overwrite every record in one atomic batch, keyed by topic.
    ///
    /// The `archived` flag of an existing row is kept; only
    /// [`set_archived`](Self::set_archived) changes it.
    async fn upsert_topics(&self, records: &[TopicScoreRecord]) -> StoreResult<()>;

    /// Read `topics`, pass the existing records to `update` and write back what
    /// it returns, all as one isolated unit. No other writer, in this process
    /// or another one sharing the backend, can interleave between the read and
    /// the write. Returns the written records.
    async fn update_topics(
        &self,
        topics: &[String],
        update: &(dyn for<'m> Fn(&'m HashMap<String, TopicScoreRecord>) -> Vec<TopicScoreRecord> + Send + Sync),
    ) -> StoreResult<Vec<TopicScoreRecord>>;

    /// Insert records whose topic does not exist yet; existing ones are left
    /// untouched. Returns how many were actually created.
    async fn insert_missing(&self, records: &[TopicScoreRecord]) -> StoreResult<usize>;

    /// All records that are not archived, ordered by topic.
    async fn read_all_active(&self) -> StoreResult<Vec<TopicScoreRecord>>;

    /// Set the archived flag. Returns false if the topic does not exist.
    async fn set_archived(&self, topic: &str, archived: bool) -> StoreResult<bool>;
}
