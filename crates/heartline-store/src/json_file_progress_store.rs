//! JSON file implementation of the `ProgressStore` trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use heartline_core::error::GameError;
use heartline_core::progress::{ProgressStore, SAVE_VERSION, SavedProgress};
use tokio::fs;
use tracing::debug;

/// Keeps the single save record in one pretty-printed JSON file.
///
/// Writes go to a sibling temporary file that is then renamed over the save,
/// so an interrupted write never leaves a truncated record behind.
#[derive(Debug, Clone)]
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    /// Creates a store for `path`. Nothing is touched until the first call.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        staging.into()
    }
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> GameError {
    GameError::Infrastructure(format!("cannot {action} {}: {err}", path.display()))
}

#[async_trait]
impl ProgressStore for JsonFileProgressStore {
    async fn load(&self) -> Result<Option<SavedProgress>, GameError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no save file");
                return Ok(None);
            }
            Err(err) => return Err(io_error("read", &self.path, &err)),
        };

        let progress: SavedProgress = serde_json::from_str(&content).map_err(|e| {
            GameError::Infrastructure(format!("corrupt save {}: {e}", self.path.display()))
        })?;
        if progress.version != SAVE_VERSION {
            return Err(GameError::Infrastructure(format!(
                "save version mismatch: expected {SAVE_VERSION}, found {}",
                progress.version
            )));
        }
        Ok(Some(progress))
    }

    async fn save(&self, progress: &SavedProgress) -> Result<(), GameError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create", parent, &e))?;
        }

        let content = serde_json::to_string_pretty(progress)
            .map_err(|e| GameError::Infrastructure(format!("cannot encode save: {e}")))?;
        let staging = self.staging_path();
        fs::write(&staging, content)
            .await
            .map_err(|e| io_error("write", &staging, &e))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| io_error("replace", &self.path, &e))?;

        debug!(path = %self.path.display(), score = progress.score, day = progress.day, "progress saved");
        Ok(())
    }
}
