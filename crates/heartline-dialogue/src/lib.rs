//! Heartline: Dialogue Player.
//!
//! Reveals an ordered list of lines one character at a time at a fixed
//! pace. The per-character delay is the only suspension point and is
//! cancel-safe, so a driver can race it against player input.

pub mod domain;

pub use domain::events::DialogueEvent;
pub use domain::player::{DialoguePlayer, DialogueView};
