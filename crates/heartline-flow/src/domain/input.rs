//! Signals sent by the player.

/// A player signal delivered to the orchestrator.
///
/// Signals that do not match what the orchestrator is currently waiting for
/// are dropped, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Choice index submitted for the current question.
    Answer(usize),
    /// Leave the result feedback and move on.
    Continue,
    /// Complete the typing line, or show the next one.
    NextDialogue,
    /// Skip the rest of the dialogue.
    SkipDialogue,
    /// Start over after game over.
    Restart,
}
