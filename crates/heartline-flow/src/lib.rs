//! Heartline: Game Flow Orchestrator.
//!
//! Sequences scene selection, dialogue playback, question batches, scoring,
//! and transition timing into one replayable loop:
//!
//! `Idle → SceneSetup → Dialogue → QuestionLoop → Transitioning → (SceneSetup | GameOver)`
//!
//! The orchestrator owns the scene bank, score tracker, and dialogue player.
//! Player signals arrive over a channel; everything shown to the player goes
//! through the [`application::presenter::Presenter`] boundary.

pub mod application;
pub mod domain;
