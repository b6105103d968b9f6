//! Heartline: Scene Content Bank.
//!
//! Owns the authored scenes (dialogue, questions, reward parameters), loads
//! them from JSON or YAML content files, and implements the daily selection
//! policies: random-without-repeat and shuffled-queue rotation.

pub mod application;
pub mod domain;
