//! SQLite-backed topic score store.

use super::{StoreResult, TopicStore};
use crate::types::TopicScoreRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::HashMap;
use std::path::Path;

/// [`TopicStore`] on a single SQLite connection.
///
/// Batches run inside one transaction, so an event's tag updates land
/// together or not at all. Read-modify-write batches take the database write
/// lock up front (`BEGIN IMMEDIATE`), which also serializes them against
/// other processes opening the same file.
pub struct SqliteTopicStore {
    conn: Mutex<Connection>,
}

impl SqliteTopicStore {
    /// Open or create a topic score database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS topic_scores (
                topic TEXT PRIMARY KEY,
                score REAL NOT NULL DEFAULT 0.5 CHECK (score >= 0.0 AND score <= 1.0),
                interaction_count INTEGER NOT NULL DEFAULT 0,
                last_updated INTEGER NOT NULL,
                archived INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_topic_scores_active
                ON topic_scores(archived, topic);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(Path::new(":memory:"))
    }

    /// Count all records, archived ones included.
    pub fn count(&self) -> StoreResult<usize> {
        let conn = self.conn.lock();
        let n = conn.query_row("SELECT COUNT(*) FROM topic_scores", [], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(n as usize)
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TopicScoreRecord> {
        let millis: i64 = row.get(3)?;
        let archived: i64 = row.get(4)?;
        Ok(TopicScoreRecord {
            topic: row.get(0)?,
            score: row.get(1)?,
            interaction_count: row.get::<_, i64>(2)? as u64,
            last_updated: DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default(),
            archived: archived != 0,
        })
    }

    fn select_topics(
        conn: &Connection,
        topics: &[String],
    ) -> rusqlite::Result<HashMap<String, TopicScoreRecord>> {
        let mut stmt = conn.prepare_cached(
            "SELECT topic, score, interaction_count, last_updated, archived
             FROM topic_scores WHERE topic = ?1",
        )?;

        let mut found = HashMap::with_capacity(topics.len());
        for topic in topics {
            if let Some(record) = stmt
                .query_row(params![topic], Self::row_to_record)
                .optional()?
            {
                found.insert(topic.clone(), record);
            }
        }
        Ok(found)
    }

    /// Upsert rows. An existing row keeps its `archived` flag.
    fn write_records(conn: &Connection, records: &[TopicScoreRecord]) -> rusqlite::Result<()> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO topic_scores (topic, score, interaction_count, last_updated, archived)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(topic) DO UPDATE SET
                score=excluded.score,
                interaction_count=excluded.interaction_count,
                last_updated=excluded.last_updated",
        )?;
        for r in records {
            stmt.execute(params![
                r.topic,
                r.score,
                r.interaction_count as i64,
                r.last_updated.timestamp_millis(),
                r.archived as i64,
            ])?;
        }
        Ok(())
    }
}

#[async_trait]
impl TopicStore for SqliteTopicStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn read_topics(&self, topics: &[String]) -> StoreResult<HashMap<String, TopicScoreRecord>> {
        let conn = self.conn.lock();
        Ok(Self::select_topics(&conn, topics)?)
    }

    async fn upsert_topics(&self, records: &[TopicScoreRecord]) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        Self::write_records(&tx, records)?;
        tx.commit()?;
        Ok(())
    }

    async fn update_topics(
        &self,
        topics: &[String],
        update: &(dyn for<'m> Fn(&'m HashMap<String, TopicScoreRecord>) -> Vec<TopicScoreRecord> + Send + Sync),
    ) -> StoreResult<Vec<TopicScoreRecord>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = Self::select_topics(&tx, topics)?;
        let updated = update(&current);
        Self::write_records(&tx, &updated)?;
        let keys: Vec<String> = updated.iter().map(|r| r.topic.clone()).collect();
        let mut written = Self::select_topics(&tx, &keys)?;
        tx.commit()?;
        Ok(keys.iter().filter_map(|k| written.remove(k)).collect())
    }

    async fn insert_missing(&self, records: &[TopicScoreRecord]) -> StoreResult<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut created = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO topic_scores
                    (topic, score, interaction_count, last_updated, archived)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for r in records {
                created += stmt.execute(params![
                    r.topic,
                    r.score,
                    r.interaction_count as i64,
                    r.last_updated.timestamp_millis(),
                    r.archived as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(created)
    }

    async fn read_all_active(&self) -> StoreResult<Vec<TopicScoreRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT topic, score, interaction_count, last_updated, archived
             FROM topic_scores WHERE archived = 0 ORDER BY topic",
        )?;
        let rows = stmt.query_map([], Self::row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    async fn set_archived(&self, topic: &str, archived: bool) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE topic_scores SET archived = ?2 WHERE topic = ?1",
            params![topic, archived as i64],
        )?;
        Ok(changed > 0)
    }
}
