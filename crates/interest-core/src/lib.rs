//! Interest scoring and content ranking for Briefing.
//!
//! Every topic a user sees carries a score in `[0, 1]` that drifts with the
//! user's reactions through an exponential moving average. Candidate content
//! is ranked from those scores, and a serendipity weight deliberately favors
//! topics the user has not shown interest in yet.

pub mod classifier;
pub mod config;
pub mod ema;
pub mod engine;
pub mod error;
pub mod locks;
pub mod ranking;
pub mod registry;
pub mod scoring;
pub mod serendipity;
pub mod store;
pub mod types;

pub use classifier::{InteractionType, UnknownInteractionPolicy};
pub use config::{CompositeWeights, ScoringConfig, SerendipityConfig};
pub use engine::InterestEngine;
pub use error::{ScoringError, StoreError};
pub use ranking::{rank_candidates, sample_serendipity, RankedCandidate};
pub use scoring::{score_channel, score_content, score_content_with_prior, try_score_channel};
pub use serendipity::{inverse_weight, is_serendipitous, ReactionRecord};
pub use store::{MemoryTopicStore, TopicStore};
#[cfg(feature = "sqlite")]
pub use store::SqliteTopicStore;
pub use types::{normalize_tags, ContentCandidate, InteractionEvent, TopicScoreRecord};
