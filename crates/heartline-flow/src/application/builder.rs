//! Explicit construction of a [`GameFlow`] from its collaborators.

use std::sync::Arc;

use heartline_content::application::bank::SceneBank;
use heartline_core::config::GameConfig;
use heartline_core::error::GameError;
use heartline_core::progress::{Clock, ProgressStore, SystemClock};
use heartline_dialogue::DialoguePlayer;
use heartline_score::ScoreTracker;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::orchestrator::GameFlow;
use crate::application::presenter::Presenter;
use crate::domain::input::PlayerInput;
use crate::domain::phase::{Phase, RunState};

/// Collects the collaborators of a [`GameFlow`].
///
/// The scene bank, presenter, and input channel are required. Configuration
/// defaults to [`GameConfig::default`], the clock to [`SystemClock`], and
/// progress is not persisted unless a store is given.
#[derive(Default)]
pub struct GameFlowBuilder {
    config: Option<GameConfig>,
    bank: Option<SceneBank>,
    presenter: Option<Box<dyn Presenter>>,
    inputs: Option<mpsc::Receiver<PlayerInput>>,
    store: Option<Arc<dyn ProgressStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl GameFlowBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn scene_bank(mut self, bank: SceneBank) -> Self {
        self.bank = Some(bank);
        self
    }

    #[must_use]
    pub fn presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    #[must_use]
    pub fn inputs(mut self, inputs: mpsc::Receiver<PlayerInput>) -> Self {
        self.inputs = Some(inputs);
        self
    }

    #[must_use]
    pub fn progress_store(mut self, store: Arc<dyn ProgressStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the orchestrator in the `Idle` phase.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MissingCollaborator` naming the first required
    /// collaborator that was not supplied, or `GameError::Config` if the
    /// configuration is inconsistent.
    pub fn build(self) -> Result<GameFlow, GameError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let bank = self
            .bank
            .ok_or(GameError::MissingCollaborator("scene bank"))?;
        let presenter = self
            .presenter
            .ok_or(GameError::MissingCollaborator("presenter"))?;
        let inputs = self
            .inputs
            .ok_or(GameError::MissingCollaborator("player input"))?;

        let score = ScoreTracker::new(config.score.clone());
        let score_events = score.subscribe();

        Ok(GameFlow {
            config: config.flow,
            bank,
            score,
            dialogue: DialoguePlayer::new(config.dialogue),
            presenter,
            inputs,
            score_events,
            store: self.store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            phase: Phase::Idle,
            run: RunState::default(),
            game_over: false,
            run_id: Uuid::new_v4(),
        })
    }
}
