//! Test progress stores: `ProgressStore` doubles for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use heartline_core::error::GameError;
use heartline_core::progress::{ProgressStore, SavedProgress};

/// A store that keeps the last save in memory and records every save call.
#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    current: Mutex<Option<SavedProgress>>,
    saves: Mutex<Vec<SavedProgress>>,
}

impl InMemoryProgressStore {
    /// Create a store that starts out holding `initial`.
    #[must_use]
    pub fn with_progress(initial: SavedProgress) -> Self {
        Self {
            current: Mutex::new(Some(initial)),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every record passed to `save`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved(&self) -> Vec<SavedProgress> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn load(&self) -> Result<Option<SavedProgress>, GameError> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn save(&self, progress: &SavedProgress) -> Result<(), GameError> {
        *self.current.lock().unwrap() = Some(progress.clone());
        self.saves.lock().unwrap().push(progress.clone());
        Ok(())
    }
}

/// A store that always returns an infrastructure error. Useful for testing
/// that persistence failures never halt the game loop.
#[derive(Debug)]
pub struct FailingProgressStore;

#[async_trait]
impl ProgressStore for FailingProgressStore {
    async fn load(&self) -> Result<Option<SavedProgress>, GameError> {
        Err(GameError::Infrastructure("disk unavailable".into()))
    }

    async fn save(&self, _progress: &SavedProgress) -> Result<(), GameError> {
        Err(GameError::Infrastructure("disk unavailable".into()))
    }
}
