//! Shared test doubles and utilities for the Heartline engine.

mod clock;
mod progress;
mod rng;

pub use clock::{FixedClock, fixed_now};
pub use progress::{FailingProgressStore, InMemoryProgressStore};
pub use rng::{MockRng, SequenceRng};
