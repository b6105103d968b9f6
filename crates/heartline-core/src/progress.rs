//! Persistence port for saved progress.
//!
//! The orchestrator reads progress once at startup and writes it after every
//! scene and on game over. Storage format and medium belong to the adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Current save record version.
pub const SAVE_VERSION: u32 = 1;

/// Abstraction over wall-clock time, used to timestamp saves.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Snapshot of the state that survives between play sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// Record format version.
    pub version: u32,
    /// Affection score at the time of the save.
    pub score: i32,
    /// Day counter of the scene bank.
    pub day: u32,
    /// Identifier of the last scene played, if any.
    pub last_scene_id: Option<String>,
    /// When the save was written.
    pub saved_at: DateTime<Utc>,
}

impl SavedProgress {
    /// Builds a record stamped with the given clock.
    #[must_use]
    pub fn new(score: i32, day: u32, last_scene_id: Option<String>, clock: &dyn Clock) -> Self {
        Self {
            version: SAVE_VERSION,
            score,
            day,
            last_scene_id,
            saved_at: clock.now(),
        }
    }
}

/// Storage for `SavedProgress`.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Loads the last saved progress, or `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<SavedProgress>, GameError>;

    /// Persists `progress`, replacing any previous save.
    async fn save(&self, progress: &SavedProgress) -> Result<(), GameError>;
}
