//! Heartline: Score Tracker.
//!
//! Holds the single bounded affection score, applies deltas, and notifies
//! observers of changes, band crossings, and depletion.

pub mod domain;

pub use domain::band::Band;
pub use domain::events::ScoreEvent;
pub use domain::tracker::ScoreTracker;
