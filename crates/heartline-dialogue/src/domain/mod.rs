//! Dialogue domain types.

pub mod events;
pub mod player;
