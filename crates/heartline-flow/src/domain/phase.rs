//! Orchestrator phases and per-scene run state.

use std::fmt;
use std::sync::Arc;

use heartline_content::domain::scene::Scene;
use serde::Serialize;

/// Orchestrator state. `Idle` is the only initial state; `GameOver` is
/// terminal until an explicit restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    SceneSetup,
    Dialogue,
    QuestionLoop,
    Transitioning,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::SceneSetup => "scene_setup",
            Self::Dialogue => "dialogue",
            Self::QuestionLoop => "question_loop",
            Self::Transitioning => "transitioning",
            Self::GameOver => "game_over",
        };
        f.write_str(name)
    }
}

/// Progress through the current scene. Rebuilt at the start of each scene.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub scene: Option<Arc<Scene>>,
    pub line_index: usize,
    pub question_index: usize,
    pub correct_answers: usize,
}

impl RunState {
    #[must_use]
    pub fn for_scene(scene: Arc<Scene>) -> Self {
        Self {
            scene: Some(scene),
            ..Self::default()
        }
    }
}

/// How a call to `play_until_game_over` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The score was depleted.
    GameOver { final_score: i32 },
    /// The player input channel closed.
    Abandoned,
}
