//! Game error types.

use thiserror::Error;

/// Top-level error type shared by every Heartline crate.
///
/// Configuration errors (`EmptyBank`, `MissingCollaborator`, `Config`) are
/// fatal to a run. Content and infrastructure errors are reported where they
/// occur; the game loop never raises them for runtime content defects.
#[derive(Debug, Error)]
pub enum GameError {
    /// The scene bank has no scenes to select from.
    #[error("scene bank is empty")]
    EmptyBank,

    /// A scene with this identifier is already registered.
    #[error("duplicate scene: {0}")]
    DuplicateScene(String),

    /// No scene with this identifier is registered.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// A dialogue was started without any lines.
    #[error("dialogue has no lines")]
    EmptyDialogue,

    /// A required collaborator was not supplied at construction time.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Content could not be parsed.
    #[error("content error: {0}")]
    Content(String),

    /// A persistence/IO error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
