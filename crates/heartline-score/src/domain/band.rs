//! Named score ranges.

use std::fmt;

use heartline_core::config::ScoreConfig;
use serde::{Deserialize, Serialize};

/// A named range of the affection score, used for narrative and UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Depleted,
    Fading,
    Neutral,
    Happy,
    Perfect,
}

impl Band {
    /// Classifies `score`. Bands are checked in descending priority
    /// (perfect, happy, neutral, fading) and the first match wins; only a
    /// score of exactly zero or below is depleted.
    #[must_use]
    pub fn from_score(score: i32, config: &ScoreConfig) -> Self {
        if score <= 0 {
            Self::Depleted
        } else if score >= config.perfect_from {
            Self::Perfect
        } else if score >= config.happy_from {
            Self::Happy
        } else if score >= config.fading_below {
            Self::Neutral
        } else {
            Self::Fading
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Depleted => "depleted",
            Self::Fading => "fading",
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Perfect => "perfect",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
