//! Striped per-topic locks.
//!
//! Read-modify-write on a topic must not interleave with another update of the
//! same topic. Topics hash onto a fixed set of async mutexes; an update takes
//! every stripe its tags map to, in ascending order, so two events sharing
//! topics can never deadlock.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tokio::sync::{Mutex, MutexGuard};

const DEFAULT_STRIPES: usize = 64;

pub struct TopicLocks {
    stripes: Vec<Mutex<()>>,
}

/// Guards held for the duration of one event update.
pub struct TopicGuards<'a> {
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl Default for TopicLocks {
    fn default() -> Self {
        Self::with_stripes(DEFAULT_STRIPES)
    }
}

impl TopicLocks {
    pub fn with_stripes(n: usize) -> Self {
        let n = n.max(1);
        Self {
            stripes: (0..n).map(|_| Mutex::new(())).collect(),
        }
    }

    fn stripe_of(&self, topic: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        topic.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    /// Lock every stripe covering `topics`.
    pub async fn lock_all(&self, topics: &[String]) -> TopicGuards<'_> {
        let mut indices: Vec<usize> = topics.iter().map(|t| self.stripe_of(t)).collect();
        indices.sort_unstable();
        indices.dedup();

        let mut guards = Vec::with_capacity(indices.len());
        for i in indices {
            guards.push(self.stripes[i].lock().await);
        }
        TopicGuards { _guards: guards }
    }
}
