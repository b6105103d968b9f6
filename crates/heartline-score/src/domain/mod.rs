//! Score domain types.

pub mod band;
pub mod events;
pub mod tracker;
