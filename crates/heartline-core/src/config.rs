//! Game configuration.
//!
//! Every tunable the engine needs is enumerated here and handed to the
//! components at construction. Missing fields fall back to defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// How the orchestrator picks the next scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Uniformly random among scenes not yet played today.
    #[default]
    Random,
    /// A shuffled queue of all scenes, reshuffled each day.
    Queue,
}

/// Affection score bounds and band thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Value at the start of a session and after a reset.
    pub starting: i32,
    /// Upper bound of the score.
    pub max: i32,
    /// Scores above zero and below this are "fading".
    pub fading_below: i32,
    /// Scores from this value are "happy".
    pub happy_from: i32,
    /// Scores from this value are "perfect".
    pub perfect_from: i32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            starting: 50,
            max: 100,
            fading_below: 30,
            happy_from: 70,
            perfect_from: 90,
        }
    }
}

/// Dialogue reveal pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Delay between two revealed characters, in milliseconds.
    pub char_delay_ms: u64,
    /// Whether `advance` may complete a line that is still typing.
    pub skip_enabled: bool,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: 30,
            skip_enabled: true,
        }
    }
}

impl DialogueConfig {
    /// Per-character delay.
    #[must_use]
    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.char_delay_ms)
    }
}

/// Phase timing and scene selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Pause between the end of dialogue and the first question.
    pub question_delay_ms: u64,
    /// Pause after "continue" before the next question.
    pub answer_delay_ms: u64,
    /// Pause in `Transitioning` before the game-over check.
    pub transition_delay_ms: u64,
    /// Scene selection policy.
    pub selection: SelectionPolicy,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            question_delay_ms: 1000,
            answer_delay_ms: 1500,
            transition_delay_ms: 2000,
            selection: SelectionPolicy::Random,
        }
    }
}

impl FlowConfig {
    #[must_use]
    pub fn question_delay(&self) -> Duration {
        Duration::from_millis(self.question_delay_ms)
    }

    #[must_use]
    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }

    #[must_use]
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub score: ScoreConfig,
    pub dialogue: DialogueConfig,
    pub flow: FlowConfig,
}

impl GameConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` if the document is malformed or invalid.
    pub fn from_json_str(source: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(source)
            .map_err(|e| GameError::Config(format!("invalid JSON config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` if the document is malformed or invalid.
    pub fn from_yaml_str(source: &str) -> Result<Self, GameError> {
        let config: Self = serde_yaml::from_str(source)
            .map_err(|e| GameError::Config(format!("invalid YAML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file, choosing the format by extension
    /// (`.yaml`/`.yml` for YAML, anything else for JSON).
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("cannot read {}: {e}", path.display())))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&source),
            _ => Self::from_json_str(&source),
        }
    }

    /// Checks that bounds and thresholds are consistent.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), GameError> {
        let score = &self.score;
        if score.max <= 0 {
            return Err(GameError::Config("score.max must be positive".to_owned()));
        }
        if !(0..=score.max).contains(&score.starting) {
            return Err(GameError::Config(format!(
                "score.starting must be within [0, {}]",
                score.max
            )));
        }
        if !(score.fading_below > 0
            && score.fading_below <= score.happy_from
            && score.happy_from <= score.perfect_from
            && score.perfect_from <= score.max)
        {
            return Err(GameError::Config(
                "band thresholds must satisfy 0 < fading_below <= happy_from <= perfect_from <= max"
                    .to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = GameConfig::default();

        assert_eq!(config.score.starting, 50);
        assert_eq!(config.score.max, 100);
        assert_eq!(config.flow.question_delay(), Duration::from_millis(1000));
        assert_eq!(config.flow.answer_delay(), Duration::from_millis(1500));
        assert_eq!(config.flow.transition_delay(), Duration::from_millis(2000));
        assert_eq!(config.flow.selection, SelectionPolicy::Random);
        assert!(config.dialogue.skip_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_in_defaults() {
        // Arrange
        let source = r#"{ "score": { "starting": 10 }, "flow": { "selection": "queue" } }"#;

        // Act
        let config = GameConfig::from_json_str(source).unwrap();

        // Assert
        assert_eq!(config.score.starting, 10);
        assert_eq!(config.score.max, 100);
        assert_eq!(config.flow.selection, SelectionPolicy::Queue);
        assert_eq!(config.dialogue.char_delay_ms, 30);
    }

    #[test]
    fn test_yaml_config_is_parsed() {
        let source = "dialogue:\n  char_delay_ms: 5\n  skip_enabled: false\n";

        let config = GameConfig::from_yaml_str(source).unwrap();

        assert_eq!(config.dialogue.char_delay(), Duration::from_millis(5));
        assert!(!config.dialogue.skip_enabled);
    }

    #[test]
    fn test_starting_above_max_is_rejected() {
        let source = r#"{ "score": { "starting": 150, "max": 100 } }"#;

        let result = GameConfig::from_json_str(source);

        match result {
            Err(GameError::Config(message)) => assert!(message.contains("score.starting")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_unordered_thresholds_are_rejected() {
        let mut config = GameConfig::default();
        config.score.happy_from = 95;

        assert!(config.validate().is_err());
    }
}
