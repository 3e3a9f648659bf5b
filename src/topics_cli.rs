//! CLI subcommands for topic interest management.
//!
//! Provides `briefing register`, `react`, `list`, `show`, `archive`,
//! `restore` and `rank` on top of the configured topic store.

use anyhow::{Context, Result};
use clap::Subcommand;
use interest_core::{
    rank_candidates, sample_serendipity, ContentCandidate, InteractionEvent, InteractionType,
    InterestEngine, ScoringError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum TopicCommands {
    /// Register topics for newly ingested content at the neutral score
    Register {
        /// Topic tags
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Record a reaction to a content item
    React {
        /// Content identifier
        #[arg(long)]
        content: String,
        /// like, save, memo, open-in-web, click-link, skip, dislike
        #[arg(short, long)]
        kind: String,
        /// Topic tags of the content (repeatable)
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,
        /// The item was served from the serendipity channel
        #[arg(long)]
        serendipity: bool,
    },
    /// List active topics by score
    List {
        /// Show at most this many topics
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show a single topic, archived or not
    Show {
        topic: String,
    },
    /// Exclude a topic from ranking, keeping its history
    Archive {
        topic: String,
    },
    /// Bring an archived topic back into ranking
    Restore {
        topic: String,
    },
    /// Rank candidates from a JSON file against current interests
    Rank {
        /// JSON array of content candidates
        file: String,
        /// Number of serendipity picks to draw
        #[arg(short, long, default_value_t = 0)]
        serendipity: usize,
        /// Seed for reproducible serendipity draws
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Read a JSON array of [`ContentCandidate`]s.
pub fn load_candidates(path: &Path) -> Result<Vec<ContentCandidate>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidates file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| "Candidates file must be a JSON array")
}

pub async fn handle_command(cmd: TopicCommands, engine: &InterestEngine) -> Result<()> {
    match cmd {
        TopicCommands::Register { tags } => {
            let created = engine.register_tags(&tags[..]).await?;
            println!("Registered {created} new topic(s)");
        }

        TopicCommands::React {
            content,
            kind,
            tags,
            serendipity,
        } => {
            let event = InteractionEvent {
                content_id: content,
                interaction_type: InteractionType::from(kind),
                tags,
            };
            let (record, updated) = engine.apply_reaction(&event, serendipity).await?;
            println!(
                "Recorded {} on {}{}",
                record.interaction_type,
                record.content_id,
                if record.is_serendipity { " (serendipity)" } else { "" }
            );
            for t in &updated {
                println!(
                    "  {}: {:.3}{}",
                    t.topic,
                    t.score,
                    if t.archived { " (archived)" } else { "" }
                );
            }
        }

        TopicCommands::List { limit } => {
            let mut topics = engine.active_topics().await?;
            if topics.is_empty() {
                println!("No active topics.");
                return Ok(());
            }
            topics.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.topic.cmp(&b.topic))
            });
            if let Some(n) = limit {
                topics.truncate(n);
            }
            println!("{} active topic(s):", topics.len());
            for t in &topics {
                println!(
                    "  {:<24} {:.3}  ({} interactions, {})",
                    t.topic,
                    t.score,
                    t.interaction_count,
                    t.last_updated.format("%Y-%m-%d %H:%M")
                );
            }
        }

        TopicCommands::Show { topic } => match engine.topic(&topic).await {
            Ok(t) => {
                println!("Topic:        {}", t.topic);
                println!("Score:        {:.3}", t.score);
                println!("Interactions: {}", t.interaction_count);
                println!("Updated:      {}", t.last_updated.to_rfc3339());
                println!("Archived:     {}", t.archived);
            }
            Err(ScoringError::NotFound(_)) => println!("No topic found: {topic}"),
            Err(e) => return Err(e.into()),
        },

        TopicCommands::Archive { topic } => {
            if engine.set_archived(&topic, true).await? {
                println!("Archived topic: {topic}");
            } else {
                println!("No topic found: {topic}");
            }
        }

        TopicCommands::Restore { topic } => {
            if engine.set_archived(&topic, false).await? {
                println!("Restored topic: {topic}");
            } else {
                println!("No topic found: {topic}");
            }
        }

        TopicCommands::Rank {
            file,
            serendipity,
            seed,
        } => {
            let candidates = load_candidates(Path::new(&file))?;
            let scores = engine.active_scores().await?;
            let config = engine.config();

            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };
            let picks = sample_serendipity(&candidates, &scores, serendipity, config, &mut rng);
            let ranked = rank_candidates(candidates, &scores, config);

            println!("{} candidate(s):", ranked.len());
            for (i, r) in ranked.iter().enumerate() {
                println!(
                    "  {:>3}. {:<24} {:.3}  (relevance {:.3}){}",
                    i + 1,
                    r.candidate.id,
                    r.final_score,
                    r.relevance,
                    if r.is_serendipity { " [serendipity]" } else { "" }
                );
            }
            if !picks.is_empty() {
                println!("Serendipity picks: {}", picks.join(", "));
            }
        }
    }

    Ok(())
}
