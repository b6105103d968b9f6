//! The game flow orchestrator.
//!
//! One task owns a [`GameFlow`] and drives it with `run` or
//! `play_until_game_over`. Suspension points (character reveal, phase
//! delays, waits for player signals) are `select!` races against the input
//! channel and the score subscription, so a depleted score pre-empts
//! whatever phase is in progress.

use std::sync::Arc;
use std::time::Duration;

use heartline_content::application::bank::SceneBank;
use heartline_content::domain::scene::Scene;
use heartline_core::config::FlowConfig;
use heartline_core::error::GameError;
use heartline_core::progress::{Clock, ProgressStore, SavedProgress};
use heartline_dialogue::DialoguePlayer;
use heartline_score::{ScoreEvent, ScoreTracker};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::application::presenter::Presenter;
use crate::domain::input::PlayerInput;
use crate::domain::phase::{Phase, RunOutcome, RunState};
use crate::domain::scoring::{AnswerFeedback, apply_answer, grade_answer};

/// Why the normal phase sequence stopped.
#[derive(Debug)]
enum Halt {
    GameOver,
    InputClosed,
    Fatal(GameError),
}

impl From<GameError> for Halt {
    fn from(err: GameError) -> Self {
        Self::Fatal(err)
    }
}

/// The finite-state sequencer driving one play session.
pub struct GameFlow {
    pub(crate) config: FlowConfig,
    pub(crate) bank: SceneBank,
    pub(crate) score: ScoreTracker,
    pub(crate) dialogue: DialoguePlayer,
    pub(crate) presenter: Box<dyn Presenter>,
    pub(crate) inputs: mpsc::Receiver<PlayerInput>,
    pub(crate) score_events: broadcast::Receiver<ScoreEvent>,
    pub(crate) store: Option<Arc<dyn ProgressStore>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) phase: Phase,
    pub(crate) run: RunState,
    pub(crate) game_over: bool,
    pub(crate) run_id: Uuid,
}

impl GameFlow {
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    #[must_use]
    pub fn bank(&self) -> &SceneBank {
        &self.bank
    }

    #[must_use]
    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Registers a score observer, e.g. for an affection bar.
    #[must_use]
    pub fn subscribe_score(&self) -> broadcast::Receiver<ScoreEvent> {
        self.score.subscribe()
    }

    /// Applies saved progress, if any. A failing store or a save whose score
    /// was already depleted leaves the fresh session untouched.
    pub async fn resume(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        match store.load().await {
            Ok(Some(progress)) if progress.score > 0 => {
                self.score.set(progress.score);
                self.bank.restore_day(progress.day);
                info!(
                    score = progress.score,
                    day = progress.day,
                    last_scene = ?progress.last_scene_id,
                    "resumed saved progress"
                );
            }
            Ok(Some(_)) => info!("saved game had ended, starting fresh"),
            Ok(None) => debug!("no saved progress"),
            Err(err) => warn!(%err, "could not load saved progress, starting fresh"),
        }
        self.drain_score_events();
    }

    /// Resumes saved progress, then plays until the input channel closes,
    /// waiting in `GameOver` for a restart signal each time the score is
    /// depleted.
    ///
    /// # Errors
    ///
    /// Returns the configuration error that made the loop impossible to run.
    pub async fn run(&mut self) -> Result<(), GameError> {
        self.resume().await;
        loop {
            match self.play_until_game_over().await? {
                RunOutcome::Abandoned => return Ok(()),
                RunOutcome::GameOver { .. } => {
                    if !self.await_restart().await {
                        return Ok(());
                    }
                    self.restart();
                }
            }
        }
    }

    /// Plays scene after scene until the score is depleted or the player
    /// input channel closes.
    ///
    /// # Errors
    ///
    /// Returns configuration errors (an empty scene bank). They are logged
    /// and shown through `Presenter::show_fatal` first.
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn play_until_game_over(&mut self) -> Result<RunOutcome, GameError> {
        loop {
            if self.game_over {
                return Ok(RunOutcome::GameOver {
                    final_score: self.score.current(),
                });
            }
            match self.play_scene().await {
                Ok(()) | Err(Halt::GameOver) => {}
                Err(Halt::InputClosed) => {
                    info!(phase = %self.phase, "player input closed, stopping");
                    return Ok(RunOutcome::Abandoned);
                }
                Err(Halt::Fatal(err)) => {
                    error!(%err, "game loop cannot run");
                    self.presenter.show_fatal(&err);
                    return Err(err);
                }
            }
        }
    }

    /// Leaves `GameOver`: resets the score, daily progress, and run state.
    pub fn restart(&mut self) {
        info!("restarting game");
        self.game_over = false;
        self.score.reset();
        self.bank.reset_daily_progress();
        self.run = RunState::default();
        self.drain_score_events();
        self.set_phase(Phase::Idle);
    }

    /// `Idle`/`Transitioning → SceneSetup`: selects the next scene and hands
    /// it to the presenter.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyBank` if there is no scene to play.
    pub fn start_game_loop(&mut self) -> Result<Arc<Scene>, GameError> {
        self.set_phase(Phase::SceneSetup);
        let scene = self.bank.select_next(self.config.selection)?;
        info!(
            scene_id = %scene.id,
            day = self.bank.day(),
            lines = scene.dialogue_lines.len(),
            questions = scene.questions.len(),
            "scene selected"
        );
        self.run = RunState::for_scene(Arc::clone(&scene));
        self.presenter.show_scene(&scene, self.bank.day());
        Ok(scene)
    }

    async fn play_scene(&mut self) -> Result<(), Halt> {
        self.check_interrupts().await?;
        let scene = self.start_game_loop()?;
        self.play_dialogue(&scene).await?;
        self.question_loop(&scene).await?;
        self.transition().await
    }

    async fn play_dialogue(&mut self, scene: &Scene) -> Result<(), Halt> {
        if scene.dialogue_lines.is_empty() {
            warn!(scene_id = %scene.id, "scene has no dialogue lines, going straight to questions");
            return Ok(());
        }

        self.set_phase(Phase::Dialogue);
        self.dialogue.start(scene.dialogue_lines.clone())?;
        self.show_dialogue();

        while !self.dialogue.is_finished() {
            tokio::select! {
                revealed = self.dialogue.reveal_next(), if self.dialogue.is_typing() => {
                    if revealed {
                        self.show_dialogue();
                    }
                }
                input = self.inputs.recv() => match input {
                    Some(PlayerInput::NextDialogue) => {
                        self.dialogue.advance();
                        self.show_dialogue();
                    }
                    Some(PlayerInput::SkipDialogue) => {
                        self.dialogue.skip_all();
                        self.show_dialogue();
                    }
                    Some(other) => debug!(input = ?other, "ignoring input during dialogue"),
                    None => return Err(Halt::InputClosed),
                },
                event = self.score_events.recv() => self.on_score_event(event).await?,
            }
            self.run.line_index = self.dialogue.current_index();
        }
        Ok(())
    }

    async fn question_loop(&mut self, scene: &Scene) -> Result<(), Halt> {
        self.set_phase(Phase::QuestionLoop);
        if scene.questions.is_empty() {
            debug!(scene_id = %scene.id, "scene has no questions");
            return Ok(());
        }

        self.pause(self.config.question_delay()).await?;

        let total = scene.questions.len();
        for (index, question) in scene.questions.iter().enumerate() {
            self.run.question_index = index;
            if !question.is_presentable() {
                warn!(scene_id = %scene.id, question = index, "skipping question without choices");
                continue;
            }

            self.presenter.show_question(question, index, total);
            let chosen = self.await_answer().await?;

            let outcome = grade_answer(question, &scene.rewards, chosen);
            apply_answer(&mut self.score, &outcome);
            if outcome.correct {
                self.run.correct_answers += 1;
            }
            info!(
                scene_id = %scene.id,
                question = index,
                chosen,
                correct = outcome.correct,
                score = self.score.current(),
                "answer graded"
            );
            self.check_interrupts().await?;

            self.presenter.show_result(&AnswerFeedback {
                correct: outcome.correct,
                text: question.response_for(outcome.correct).map(str::to_owned),
                delta: outcome.delta,
                score: self.score.current(),
            });
            self.await_continue().await?;
            self.pause(self.config.answer_delay()).await?;
        }
        Ok(())
    }

    async fn transition(&mut self) -> Result<(), Halt> {
        self.set_phase(Phase::Transitioning);
        info!(
            correct = self.run.correct_answers,
            score = self.score.current(),
            "scene finished"
        );
        self.save_progress().await;
        self.pause(self.config.transition_delay()).await?;

        if self.score.is_depleted() {
            self.enter_game_over().await;
            return Err(Halt::GameOver);
        }
        Ok(())
    }

    /// The only way into `GameOver`. Repeated triggers are ignored.
    async fn enter_game_over(&mut self) {
        if self.game_over {
            debug!("game over already entered");
            return;
        }
        self.game_over = true;
        self.set_phase(Phase::GameOver);
        let final_score = self.score.current();
        info!(final_score, "game over");
        self.presenter.show_game_over(final_score);
        self.save_progress().await;
    }

    async fn await_answer(&mut self) -> Result<usize, Halt> {
        loop {
            tokio::select! {
                input = self.inputs.recv() => match input {
                    Some(PlayerInput::Answer(index)) => return Ok(index),
                    Some(other) => debug!(input = ?other, "ignoring input while awaiting answer"),
                    None => return Err(Halt::InputClosed),
                },
                event = self.score_events.recv() => self.on_score_event(event).await?,
            }
        }
    }

    async fn await_continue(&mut self) -> Result<(), Halt> {
        loop {
            tokio::select! {
                input = self.inputs.recv() => match input {
                    Some(PlayerInput::Continue) => return Ok(()),
                    Some(other) => debug!(input = ?other, "ignoring input while awaiting continue"),
                    None => return Err(Halt::InputClosed),
                },
                event = self.score_events.recv() => self.on_score_event(event).await?,
            }
        }
    }

    /// Waits in `GameOver` for `Restart`. Returns `false` if input closed.
    async fn await_restart(&mut self) -> bool {
        while let Some(input) = self.inputs.recv().await {
            if input == PlayerInput::Restart {
                return true;
            }
            debug!(input = ?input, "ignoring input after game over");
        }
        false
    }

    /// Fixed delay during which every incoming signal is dropped.
    async fn pause(&mut self, duration: Duration) -> Result<(), Halt> {
        let deadline = Instant::now() + duration;
        loop {
            tokio::select! {
                () = tokio::time::sleep_until(deadline) => return Ok(()),
                input = self.inputs.recv() => match input {
                    Some(dropped) => debug!(input = ?dropped, "dropping input during transition"),
                    None => return Err(Halt::InputClosed),
                },
                event = self.score_events.recv() => self.on_score_event(event).await?,
            }
        }
    }

    async fn on_score_event(&mut self, event: Result<ScoreEvent, RecvError>) -> Result<(), Halt> {
        let depleted = match event {
            Ok(ScoreEvent::Depleted) => true,
            Ok(_) | Err(RecvError::Closed) => false,
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "score subscription lagged");
                self.score.is_depleted()
            }
        };
        if depleted {
            self.enter_game_over().await;
            return Err(Halt::GameOver);
        }
        Ok(())
    }

    /// Consumes pending score notifications; enters `GameOver` if one of
    /// them reported depletion.
    async fn check_interrupts(&mut self) -> Result<(), Halt> {
        if self.drain_score_events() {
            self.enter_game_over().await;
            return Err(Halt::GameOver);
        }
        Ok(())
    }

    fn drain_score_events(&mut self) -> bool {
        let mut depleted = false;
        loop {
            match self.score_events.try_recv() {
                Ok(ScoreEvent::Depleted) => depleted = true,
                Ok(_) => {}
                Err(TryRecvError::Lagged(_)) => depleted |= self.score.is_depleted(),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return depleted,
            }
        }
    }

    async fn save_progress(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let progress = SavedProgress::new(
            self.score.current(),
            self.bank.day(),
            self.run.scene.as_ref().map(|scene| scene.id.clone()),
            self.clock.as_ref(),
        );
        if let Err(err) = store.save(&progress).await {
            warn!(%err, "could not save progress");
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, "phase change");
        self.phase = phase;
        self.presenter.show_phase(phase);
    }

    fn show_dialogue(&mut self) {
        let view = self.dialogue.view();
        self.presenter.show_dialogue(&view);
    }
}
