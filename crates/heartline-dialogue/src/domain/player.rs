//! The dialogue player.

use heartline_core::config::DialogueConfig;
use heartline_core::error::GameError;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;

use super::events::DialogueEvent;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Idle,
    Typing,
    Waiting,
    Finished,
}

/// What the UI needs to draw the current line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueView {
    pub index: usize,
    pub total: usize,
    pub visible: String,
    pub typing: bool,
}

/// Reveals dialogue lines character by character.
#[derive(Debug)]
pub struct DialoguePlayer {
    config: DialogueConfig,
    lines: Vec<String>,
    cursor: usize,
    revealed: usize,
    state: Playback,
    /// When the next character is due. Survives dropped `reveal_next` futures.
    next_char_at: Instant,
    events: broadcast::Sender<DialogueEvent>,
}

impl DialoguePlayer {
    #[must_use]
    pub fn new(config: DialogueConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            lines: Vec::new(),
            cursor: 0,
            revealed: 0,
            state: Playback::Idle,
            next_char_at: Instant::now(),
            events,
        }
    }

    /// Registers an observer; dropping the receiver ends the registration.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DialogueEvent> {
        self.events.subscribe()
    }

    /// Begins revealing `lines` from the first one.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyDialogue` if `lines` is empty.
    pub fn start(&mut self, lines: Vec<String>) -> Result<(), GameError> {
        if lines.is_empty() {
            return Err(GameError::EmptyDialogue);
        }
        self.lines = lines;
        self.cursor = 0;
        self.begin_line();
        Ok(())
    }

    /// Waits until the next character is due, then reveals it. Returns
    /// `false` without waiting if nothing is being typed.
    ///
    /// Cancel-safe: dropping the future leaves the line exactly as it was,
    /// and the next call waits for the same deadline rather than a fresh
    /// delay.
    pub async fn reveal_next(&mut self) -> bool {
        if self.state != Playback::Typing {
            return false;
        }
        tokio::time::sleep_until(self.next_char_at).await;
        self.next_char_at += self.config.char_delay();
        self.revealed += 1;
        if self.revealed >= self.current_line_len() {
            self.state = Playback::Waiting;
        }
        true
    }

    /// Player "next" signal.
    ///
    /// While typing, completes the current line (only when skipping is
    /// enabled). Otherwise starts the next line, or completes the dialogue
    /// after the last one.
    pub fn advance(&mut self) {
        match self.state {
            Playback::Idle | Playback::Finished => {}
            Playback::Typing => {
                if self.config.skip_enabled {
                    self.complete_line();
                }
            }
            Playback::Waiting => {
                if self.cursor + 1 < self.lines.len() {
                    self.cursor += 1;
                    self.begin_line();
                } else {
                    self.finish();
                }
            }
        }
    }

    /// Ends the dialogue immediately, leaving the current line fully shown.
    pub fn skip_all(&mut self) {
        if matches!(self.state, Playback::Idle | Playback::Finished) {
            return;
        }
        self.complete_line();
        debug!(line = self.cursor, total = self.lines.len(), "dialogue skipped");
        self.finish();
    }

    /// Reveals and advances through every remaining line without input.
    pub async fn play_to_end(&mut self) {
        loop {
            match self.state {
                Playback::Idle | Playback::Finished => return,
                Playback::Typing => {
                    self.reveal_next().await;
                }
                Playback::Waiting => self.advance(),
            }
        }
    }

    /// The revealed part of the current line.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        let Some(line) = self.lines.get(self.cursor) else {
            return "";
        };
        let end = line
            .char_indices()
            .nth(self.revealed)
            .map_or(line.len(), |(byte, _)| byte);
        &line[..end]
    }

    #[must_use]
    pub fn view(&self) -> DialogueView {
        DialogueView {
            index: self.cursor,
            total: self.lines.len(),
            visible: self.visible_text().to_owned(),
            typing: self.is_typing(),
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.state == Playback::Typing
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == Playback::Finished
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor)
            .map_or(0, |line| line.chars().count())
    }

    fn begin_line(&mut self) {
        self.revealed = 0;
        self.next_char_at = Instant::now() + self.config.char_delay();
        self.state = if self.current_line_len() == 0 {
            Playback::Waiting
        } else {
            Playback::Typing
        };
        self.emit(DialogueEvent::LineShown {
            index: self.cursor,
            total: self.lines.len(),
        });
    }

    fn complete_line(&mut self) {
        self.revealed = self.current_line_len();
        self.state = Playback::Waiting;
    }

    fn finish(&mut self) {
        self.state = Playback::Finished;
        self.emit(DialogueEvent::Completed);
    }

    fn emit(&self, event: DialogueEvent) {
        if self.events.send(event).is_err() {
            debug!(?event, "dialogue event had no observers");
        }
    }
}
