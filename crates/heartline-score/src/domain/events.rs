//! Notifications emitted by the score tracker.

use serde::Serialize;

use super::band::Band;

/// Score tracker notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreEvent {
    /// The score was written, possibly to the same value.
    Changed { old: i32, new: i32 },
    /// The score entered a different band.
    BandCrossed { band: Band },
    /// The score reached zero.
    Depleted,
}
