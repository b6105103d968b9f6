//! Presenter that publishes a pollable snapshot of the game.

use heartline_content::domain::scene::{Question, Scene};
use heartline_core::config::ScoreConfig;
use heartline_core::error::GameError;
use heartline_dialogue::DialogueView;
use heartline_flow::application::presenter::Presenter;
use heartline_flow::domain::phase::Phase;
use heartline_flow::domain::scoring::AnswerFeedback;
use heartline_score::{Band, ScoreEvent, ScoreTracker};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// The scene being played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneView {
    pub id: String,
    pub display_name: String,
}

/// The question awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub prompt: String,
    pub choices: Vec<String>,
    pub index: usize,
    pub total: usize,
}

/// Everything a client needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub day: u32,
    pub score: i32,
    pub max_score: i32,
    pub band: Band,
    /// Score as a fraction of the maximum, for the affection bar.
    pub fill: f64,
    pub scene: Option<SceneView>,
    pub dialogue: Option<DialogueView>,
    pub question: Option<QuestionView>,
    pub result: Option<AnswerFeedback>,
    pub final_score: Option<i32>,
    pub fatal: Option<String>,
}

impl GameSnapshot {
    /// The snapshot before the first scene.
    #[must_use]
    pub fn initial(config: &ScoreConfig) -> Self {
        let mut snapshot = Self {
            phase: Phase::Idle,
            day: 1,
            score: 0,
            max_score: config.max,
            band: Band::Depleted,
            fill: 0.0,
            scene: None,
            dialogue: None,
            question: None,
            result: None,
            final_score: None,
            fatal: None,
        };
        snapshot.apply_score(config.starting, config);
        snapshot
    }

    fn apply_score(&mut self, score: i32, config: &ScoreConfig) {
        self.score = score;
        self.band = Band::from_score(score, config);
        self.fill = ScoreTracker::fraction_of(score, config);
    }
}

/// Writes every orchestrator call into a `watch` channel.
#[derive(Debug)]
pub struct SnapshotPresenter {
    snapshot: watch::Sender<GameSnapshot>,
}

impl SnapshotPresenter {
    #[must_use]
    pub fn new(snapshot: watch::Sender<GameSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl Presenter for SnapshotPresenter {
    fn show_phase(&mut self, phase: Phase) {
        self.snapshot.send_modify(|s| {
            s.phase = phase;
            match phase {
                Phase::Idle => {
                    s.final_score = None;
                    s.fatal = None;
                }
                Phase::SceneSetup => {
                    s.dialogue = None;
                    s.question = None;
                    s.result = None;
                }
                Phase::Dialogue | Phase::QuestionLoop | Phase::Transitioning | Phase::GameOver => {}
            }
        });
    }

    fn show_scene(&mut self, scene: &Scene, day: u32) {
        self.snapshot.send_modify(|s| {
            s.day = day;
            s.scene = Some(SceneView {
                id: scene.id.clone(),
                display_name: scene.display_name.clone(),
            });
        });
    }

    fn show_dialogue(&mut self, view: &DialogueView) {
        self.snapshot
            .send_modify(|s| s.dialogue = Some(view.clone()));
    }

    fn show_question(&mut self, question: &Question, index: usize, total: usize) {
        self.snapshot.send_modify(|s| {
            s.result = None;
            s.question = Some(QuestionView {
                prompt: question.prompt.clone(),
                choices: question.choices.clone(),
                index,
                total,
            });
        });
    }

    fn show_result(&mut self, feedback: &AnswerFeedback) {
        self.snapshot.send_modify(|s| {
            s.question = None;
            s.result = Some(feedback.clone());
        });
    }

    fn show_game_over(&mut self, final_score: i32) {
        self.snapshot.send_modify(|s| {
            s.question = None;
            s.final_score = Some(final_score);
        });
    }

    fn show_fatal(&mut self, error: &GameError) {
        self.snapshot
            .send_modify(|s| s.fatal = Some(error.to_string()));
    }
}

/// Keeps the snapshot's score fields in step with the score tracker until
/// the tracker is dropped.
pub fn spawn_score_observer(
    mut events: broadcast::Receiver<ScoreEvent>,
    snapshot: watch::Sender<GameSnapshot>,
    config: ScoreConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ScoreEvent::Changed { new, .. }) => {
                    snapshot.send_modify(|s| s.apply_score(new, &config));
                }
                // The tracker logs these itself.
                Ok(ScoreEvent::BandCrossed { .. } | ScoreEvent::Depleted) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "score observer lagged"),
                Err(RecvError::Closed) => return,
            }
        }
    })
}
