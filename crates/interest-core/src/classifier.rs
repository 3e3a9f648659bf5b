//! Reaction kinds and their interest weights.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user reaction to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionType {
    Like,
    Save,
    /// User attached a note to the item.
    Memo,
    OpenInWeb,
    ClickLink,
    Skip,
    Dislike,
    /// Anything outside the known set. Carries the raw label for logging.
    Unknown(String),
}

impl InteractionType {
    /// Weight in `[-1, 1]` fed into the EMA update.
    pub fn weight(&self) -> f64 {
        match self {
            InteractionType::Like => 1.0,
            InteractionType::Save => 0.8,
            InteractionType::Memo => 0.8,
            InteractionType::OpenInWeb => 0.5,
            InteractionType::ClickLink => 0.4,
            InteractionType::Skip => -0.3,
            InteractionType::Dislike => -0.8,
            InteractionType::Unknown(_) => 0.0,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, InteractionType::Unknown(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            InteractionType::Like => "like",
            InteractionType::Save => "save",
            InteractionType::Memo => "memo",
            InteractionType::OpenInWeb => "open-in-web",
            InteractionType::ClickLink => "click-link",
            InteractionType::Skip => "skip",
            InteractionType::Dislike => "dislike",
            InteractionType::Unknown(raw) => raw,
        }
    }
}

impl FromStr for InteractionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        Ok(match key.as_str() {
            "like" => InteractionType::Like,
            "save" => InteractionType::Save,
            "memo" | "annotate" => InteractionType::Memo,
            "open-in-web" | "open-web" | "open" => InteractionType::OpenInWeb,
            "click-link" | "link-click" | "click" => InteractionType::ClickLink,
            "skip" => InteractionType::Skip,
            "dislike" => InteractionType::Dislike,
            _ => InteractionType::Unknown(s.trim().to_string()),
        })
    }
}

impl From<String> for InteractionType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<InteractionType> for String {
    fn from(t: InteractionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a reaction whose kind is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownInteractionPolicy {
    /// Apply with weight 0; the interaction count still advances.
    #[default]
    Count,
    /// Drop the event without touching the store.
    Ignore,
    /// Fail the event with a validation error.
    Reject,
}
