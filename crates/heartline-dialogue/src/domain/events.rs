//! Notifications emitted by the dialogue player.

/// Dialogue player notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueEvent {
    /// A new line began revealing.
    LineShown { index: usize, total: usize },
    /// The cursor passed the last line, or the dialogue was skipped.
    Completed,
}
