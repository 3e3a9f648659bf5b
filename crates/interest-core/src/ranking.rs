//! Candidate ranking and serendipity draws for briefing assembly.

use crate::config::ScoringConfig;
use crate::scoring::{score_channel, score_content_with_prior};
use crate::serendipity::{inverse_weight, is_serendipitous};
use crate::types::ContentCandidate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A candidate with its scoring breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCandidate {
    pub candidate: ContentCandidate,
    /// Supplied relevance, or the content score from topic interest.
    pub relevance: f64,
    /// Composite channel score used for ordering.
    pub final_score: f64,
    pub is_serendipity: bool,
}

/// Score and sort candidates, best first. Ties go to the lower id.
pub fn rank_candidates(
    candidates: Vec<ContentCandidate>,
    topic_scores: &HashMap<String, f64>,
    config: &ScoringConfig,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let relevance = candidate
                .relevance
                .unwrap_or_else(|| {
                    score_content_with_prior(&candidate.tags, topic_scores, config.neutral_score)
                });
            let final_score = score_channel(
                relevance,
                candidate.context_match,
                candidate.recency,
                &config.composite,
            );
            let is_serendipity = is_serendipitous(&candidate, &config.serendipity);
            RankedCandidate {
                candidate,
                relevance,
                final_score,
                is_serendipity,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    ranked
}

/// Draw up to `count` candidate ids for exploration, without replacement,
/// each with probability proportional to its inverse weight.
///
/// Returns nothing when serendipity is disabled in `config`.
pub fn sample_serendipity<R: Rng>(
    candidates: &[ContentCandidate],
    topic_scores: &HashMap<String, f64>,
    count: usize,
    config: &ScoringConfig,
    rng: &mut R,
) -> Vec<String> {
    if !config.serendipity.enabled || count == 0 {
        return Vec::new();
    }

    let mut pool: Vec<(&ContentCandidate, f64)> = candidates
        .iter()
        .map(|c| (c, inverse_weight(&c.tags, topic_scores, &config.serendipity)))
        .collect();

    let mut picked = Vec::with_capacity(count.min(pool.len()));
    while picked.len() < count && !pool.is_empty() {
        let total: f64 = pool.iter().map(|(_, w)| w).sum();
        let mut target = rng.random::<f64>() * total;
        let mut chosen = pool.len() - 1;
        for (i, (_, w)) in pool.iter().enumerate() {
            if target < *w {
                chosen = i;
                break;
            }
            target -= w;
        }
        let (candidate, _) = pool.swap_remove(chosen);
        picked.push(candidate.id.clone());
    }
    picked
}
