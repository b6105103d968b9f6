//! Shared application state.

use heartline_flow::domain::input::PlayerInput;
use tokio::sync::{mpsc, watch};

use crate::presenter::GameSnapshot;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Player signals into the running game loop.
    pub inputs: mpsc::Sender<PlayerInput>,
    /// Latest snapshot published by the presenter.
    pub snapshot: watch::Receiver<GameSnapshot>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        inputs: mpsc::Sender<PlayerInput>,
        snapshot: watch::Receiver<GameSnapshot>,
    ) -> Self {
        Self { inputs, snapshot }
    }
}
