//! Shared harness for game flow integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use heartline_content::application::bank::SceneBank;
use heartline_content::domain::scene::{Question, Scene};
use heartline_core::config::GameConfig;
use heartline_core::error::GameError;
use heartline_core::rng::DeterministicRng;
use heartline_dialogue::DialogueView;
use heartline_flow::application::builder::GameFlowBuilder;
use heartline_flow::application::orchestrator::GameFlow;
use heartline_flow::application::presenter::Presenter;
use heartline_flow::domain::input::PlayerInput;
use heartline_flow::domain::phase::Phase;
use heartline_flow::domain::scoring::AnswerFeedback;
use heartline_test_support::{FixedClock, InMemoryProgressStore, MockRng};
use tokio::sync::mpsc;

/// Something the orchestrator handed to the presenter.
#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Phase(Phase),
    Scene { id: String, day: u32 },
    Dialogue(DialogueView),
    Question { prompt: String, index: usize, total: usize },
    Result(AnswerFeedback),
    GameOver(i32),
    Fatal(String),
}

/// Forwards every presenter call over a channel the test reads from.
pub struct ChannelPresenter(mpsc::UnboundedSender<Shown>);

impl ChannelPresenter {
    fn send(&self, shown: Shown) {
        // The test may already have stopped listening.
        let _ = self.0.send(shown);
    }
}

impl Presenter for ChannelPresenter {
    fn show_phase(&mut self, phase: Phase) {
        self.send(Shown::Phase(phase));
    }

    fn show_scene(&mut self, scene: &Scene, day: u32) {
        self.send(Shown::Scene {
            id: scene.id.clone(),
            day,
        });
    }

    fn show_dialogue(&mut self, view: &DialogueView) {
        self.send(Shown::Dialogue(view.clone()));
    }

    fn show_question(&mut self, question: &Question, index: usize, total: usize) {
        self.send(Shown::Question {
            prompt: question.prompt.clone(),
            index,
            total,
        });
    }

    fn show_result(&mut self, feedback: &AnswerFeedback) {
        self.send(Shown::Result(feedback.clone()));
    }

    fn show_game_over(&mut self, final_score: i32) {
        self.send(Shown::GameOver(final_score));
    }

    fn show_fatal(&mut self, error: &GameError) {
        self.send(Shown::Fatal(error.to_string()));
    }
}

/// The test's side of a running flow.
pub struct Harness {
    pub inputs: mpsc::Sender<PlayerInput>,
    pub shown: mpsc::UnboundedReceiver<Shown>,
    pub store: Arc<InMemoryProgressStore>,
}

impl Harness {
    pub async fn send(&self, input: PlayerInput) {
        self.inputs.send(input).await.unwrap();
    }

    /// Receives presenter calls until `matches` accepts one, returning it
    /// together with everything skipped on the way.
    pub async fn wait_for<F>(&mut self, matches: F) -> (Shown, Vec<Shown>)
    where
        F: Fn(&Shown) -> bool,
    {
        let mut skipped = Vec::new();
        loop {
            let shown = tokio::time::timeout(Duration::from_secs(60), self.shown.recv())
                .await
                .expect("timed out waiting for the presenter")
                .expect("presenter channel closed");
            if matches(&shown) {
                return (shown, skipped);
            }
            skipped.push(shown);
        }
    }

    /// Everything shown so far that the test has not read yet.
    pub fn drain_shown(&mut self) -> Vec<Shown> {
        let mut shown = Vec::new();
        while let Ok(next) = self.shown.try_recv() {
            shown.push(next);
        }
        shown
    }

    pub async fn wait_for_scene(&mut self) -> (String, u32) {
        match self.wait_for(|s| matches!(s, Shown::Scene { .. })).await.0 {
            Shown::Scene { id, day } => (id, day),
            _ => unreachable!(),
        }
    }

    pub async fn wait_for_question(&mut self) -> usize {
        match self.wait_for(|s| matches!(s, Shown::Question { .. })).await.0 {
            Shown::Question { index, .. } => index,
            _ => unreachable!(),
        }
    }

    pub async fn wait_for_result(&mut self) -> AnswerFeedback {
        match self.wait_for(|s| matches!(s, Shown::Result(_))).await.0 {
            Shown::Result(feedback) => feedback,
            _ => unreachable!(),
        }
    }
}

/// Fast timings so paused-clock tests stay short.
pub fn test_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.dialogue.char_delay_ms = 10;
    config
}

/// A scene with one dialogue line and one question whose answer is `B`.
pub fn quiz_scene(id: &str) -> Scene {
    Scene::new(id, id)
        .with_lines(["Hello!"])
        .with_question(
            Question::new("Favourite letter?", vec!["A".to_owned(), "B".to_owned()], 1)
                .with_responses("Me too!", "Oh..."),
        )
        .with_rewards(10, 5)
}

pub fn build_flow(config: GameConfig, scenes: Vec<Scene>) -> (GameFlow, Harness) {
    build_flow_with_rng(config, scenes, Box::new(MockRng))
}

pub fn build_flow_with_rng(
    config: GameConfig,
    scenes: Vec<Scene>,
    rng: Box<dyn DeterministicRng>,
) -> (GameFlow, Harness) {
    let (input_tx, input_rx) = mpsc::channel(16);
    let (shown_tx, shown_rx) = mpsc::unbounded_channel();
    let store = Arc::new(InMemoryProgressStore::default());
    let bank = SceneBank::from_scenes(scenes, rng).unwrap();

    let flow = GameFlowBuilder::new()
        .config(config)
        .scene_bank(bank)
        .presenter(Box::new(ChannelPresenter(shown_tx)))
        .inputs(input_rx)
        .progress_store(store.clone())
        .clock(Arc::new(FixedClock::default()))
        .build()
        .unwrap();

    (
        flow,
        Harness {
            inputs: input_tx,
            shown: shown_rx,
            store,
        },
    )
}
