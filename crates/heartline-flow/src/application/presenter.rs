//! The UI boundary.

use heartline_content::domain::scene::{Question, Scene};
use heartline_core::error::GameError;
use heartline_dialogue::DialogueView;

use crate::domain::phase::Phase;
use crate::domain::scoring::AnswerFeedback;

/// Everything the orchestrator shows to the player.
///
/// Calls are fire-and-forget; the presenter answers through `PlayerInput`
/// signals, never through return values.
pub trait Presenter: Send {
    /// The orchestrator entered `phase`.
    fn show_phase(&mut self, phase: Phase);

    /// A new scene was selected for `day`.
    fn show_scene(&mut self, scene: &Scene, day: u32);

    /// The dialogue line changed or revealed another character.
    fn show_dialogue(&mut self, view: &DialogueView);

    /// Question `index` of `total` awaits an answer.
    fn show_question(&mut self, question: &Question, index: usize, total: usize);

    /// The last answer was graded.
    fn show_result(&mut self, feedback: &AnswerFeedback);

    /// The game ended with `final_score`.
    fn show_game_over(&mut self, final_score: i32);

    /// The game cannot start or continue.
    fn show_fatal(&mut self, error: &GameError);
}
