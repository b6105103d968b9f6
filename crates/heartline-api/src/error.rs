//! Heartline: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use heartline_core::error::GameError;
use serde::Serialize;
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration, content, or wiring rejected by the engine.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// The game loop task is no longer receiving signals.
    LoopStopped,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::LoopStopped => (
                StatusCode::SERVICE_UNAVAILABLE,
                "game_loop_stopped",
                "the game loop is not running".to_owned(),
            ),
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
