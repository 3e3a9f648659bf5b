//! WASM bindings for the briefing UI.
//!
//! Exposes the pure interest-core scorers to JavaScript via wasm-bindgen.
//! The UI calls these to preview rankings and exploration weights using the
//! exact same logic as the server.

use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use interest_core::config::{CompositeWeights, ScoringConfig, SerendipityConfig};
use interest_core::types::ContentCandidate;
use interest_core::{classifier::InteractionType, ranking, scoring, serendipity};

fn parse_scores(scores_json: &str) -> Result<HashMap<String, f64>, JsError> {
    serde_json::from_str(scores_json)
        .map_err(|e| JsError::new(&format!("invalid topic scores JSON: {e}")))
}

fn parse_tags(tags_json: &str) -> Result<Vec<String>, JsError> {
    serde_json::from_str(tags_json).map_err(|e| JsError::new(&format!("invalid tags JSON: {e}")))
}

/// Relevance of a tagged item.
///
/// Input: JSON array of tags + JSON object mapping topic to score.
#[wasm_bindgen]
pub fn score_content(tags_json: &str, scores_json: &str) -> Result<f64, JsError> {
    let tags = parse_tags(tags_json)?;
    let scores = parse_scores(scores_json)?;
    Ok(scoring::score_content(&tags, &scores))
}

/// Composite channel score with the default weights.
///
/// Either auxiliary signal may be `undefined`, in which case `relevance`
/// passes through. Throws on non-finite or out-of-range input.
#[wasm_bindgen]
pub fn score_channel(
    relevance: f64,
    context_match: Option<f64>,
    recency: Option<f64>,
) -> Result<f64, JsError> {
    scoring::try_score_channel(relevance, context_match, recency, &CompositeWeights::default())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Exploration weight of a tagged item with the default boost and floor.
#[wasm_bindgen]
pub fn inverse_weight(tags_json: &str, scores_json: &str) -> Result<f64, JsError> {
    let tags = parse_tags(tags_json)?;
    let scores = parse_scores(scores_json)?;
    Ok(serendipity::inverse_weight(
        &tags,
        &scores,
        &SerendipityConfig::default(),
    ))
}

/// Interest weight of a reaction label; unknown labels weigh 0.
#[wasm_bindgen]
pub fn interaction_weight(kind: &str) -> f64 {
    InteractionType::from(kind.to_string()).weight()
}

/// Rank candidates against topic scores.
///
/// Input: JSON array of candidates + JSON object mapping topic to score.
/// Returns: sorted RankedCandidate array as JsValue.
#[wasm_bindgen]
pub fn rank_candidates(candidates_json: &str, scores_json: &str) -> Result<JsValue, JsError> {
    let candidates: Vec<ContentCandidate> = serde_json::from_str(candidates_json)
        .map_err(|e| JsError::new(&format!("invalid candidates JSON: {e}")))?;
    let scores = parse_scores(scores_json)?;

    let ranked = ranking::rank_candidates(candidates, &scores, &ScoringConfig::default());
    serde_wasm_bindgen::to_value(&ranked).map_err(|e| JsError::new(&e.to_string()))
}
