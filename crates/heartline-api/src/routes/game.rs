//! Routes for playing the game: snapshot reads and player signals.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use heartline_flow::domain::input::PlayerInput;
use heartline_flow::domain::phase::Phase;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::presenter::GameSnapshot;
use crate::state::AppState;

/// Request body for POST /answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Zero-based index of the chosen answer.
    pub index: usize,
}

/// Response body returned once a signal was queued.
#[derive(Debug, Serialize)]
pub struct SignalResponse {
    pub signal: &'static str,
    /// Phase at the time the signal was queued. The game loop may not have
    /// acted on it yet.
    pub phase: Phase,
}

async fn forward(
    state: &AppState,
    signal: &'static str,
    input: PlayerInput,
) -> Result<(StatusCode, Json<SignalResponse>), ApiError> {
    state
        .inputs
        .send(input)
        .await
        .map_err(|_| ApiError::LoopStopped)?;
    let phase = state.snapshot.borrow().phase;
    info!(signal, %phase, "player signal queued");
    Ok((StatusCode::ACCEPTED, Json(SignalResponse { signal, phase })))
}

/// GET /
async fn snapshot(State(state): State<AppState>) -> Json<GameSnapshot> {
    Json(state.snapshot.borrow().clone())
}

/// POST /answer
#[instrument(skip(state, request), fields(index = request.index))]
async fn answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<(StatusCode, Json<SignalResponse>), ApiError> {
    forward(&state, "answer", PlayerInput::Answer(request.index)).await
}

/// POST /continue
#[instrument(skip(state))]
async fn continue_after_result(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SignalResponse>), ApiError> {
    forward(&state, "continue", PlayerInput::Continue).await
}

/// POST /next
#[instrument(skip(state))]
async fn next_dialogue(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SignalResponse>), ApiError> {
    forward(&state, "next", PlayerInput::NextDialogue).await
}

/// POST /skip
#[instrument(skip(state))]
async fn skip_dialogue(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SignalResponse>), ApiError> {
    forward(&state, "skip", PlayerInput::SkipDialogue).await
}

/// POST /restart
#[instrument(skip(state))]
async fn restart(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SignalResponse>), ApiError> {
    forward(&state, "restart", PlayerInput::Restart).await
}

/// Returns the router for the game, to be nested under `/api/v1/game`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(snapshot))
        .route("/answer", post(answer))
        .route("/continue", post(continue_after_result))
        .route("/next", post(next_dialogue))
        .route("/skip", post(skip_dialogue))
        .route("/restart", post(restart))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use heartline_core::config::ScoreConfig;
    use serde_json::Value;
    use tokio::sync::{mpsc, watch};
    use tower::ServiceExt;

    fn app_state() -> (AppState, mpsc::Receiver<PlayerInput>) {
        let (tx, rx) = mpsc::channel(4);
        let (_snapshot_tx, snapshot) =
            watch::channel(GameSnapshot::initial(&ScoreConfig::default()));
        (AppState::new(tx, snapshot), rx)
    }

    fn post(uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method("POST").uri(uri);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_answer_forwards_index_and_returns_202() {
        // Arrange
        let (state, mut rx) = app_state();
        let app = router().with_state(state);
        let request = post("/answer", Some(serde_json::json!({ "index": 2 })));

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["signal"], "answer");
        assert_eq!(json["phase"], "idle");
        assert_eq!(rx.try_recv().unwrap(), PlayerInput::Answer(2));
    }

    #[tokio::test]
    async fn test_skip_forwards_skip_dialogue() {
        let (state, mut rx) = app_state();
        let app = router().with_state(state);

        let response = app.oneshot(post("/skip", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(rx.try_recv().unwrap(), PlayerInput::SkipDialogue);
    }

    #[tokio::test]
    async fn test_signal_after_loop_stopped_returns_503() {
        let (state, rx) = app_state();
        drop(rx);
        let app = router().with_state(state);

        let response = app.oneshot(post("/restart", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["error"], "game_loop_stopped");
    }

    #[tokio::test]
    async fn test_answer_without_index_is_rejected() {
        let (state, mut rx) = app_state();
        let app = router().with_state(state);

        let response = app
            .oneshot(post("/answer", Some(serde_json::json!({}))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(rx.try_recv().is_err());
    }
}
