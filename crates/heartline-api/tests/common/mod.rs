//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use heartline_api::presenter::{GameSnapshot, SnapshotPresenter, spawn_score_observer};
use heartline_api::routes;
use heartline_api::state::AppState;
use heartline_content::application::bank::SceneBank;
use heartline_content::domain::scene::{Question, Scene};
use heartline_core::config::GameConfig;
use heartline_flow::application::builder::GameFlowBuilder;
use heartline_test_support::{FixedClock, InMemoryProgressStore, MockRng};
use http_body_util::BodyExt;
use tokio::sync::{mpsc, watch};
use tower::ServiceExt;

/// A running game behind the full router.
pub struct TestGame {
    pub app: Router,
    pub store: Arc<InMemoryProgressStore>,
}

/// One scene with a single question whose answer is index 1.
pub fn cafe_scene() -> Scene {
    Scene::new("cafe", "Morning Cafe")
        .with_lines(["Hi!", "Coffee?"])
        .with_question(
            Question::new(
                "What was on offer?",
                vec!["Tea".to_owned(), "Coffee".to_owned()],
                1,
            )
            .with_responses("Yes!", "Not quite."),
        )
        .with_rewards(10, 5)
}

/// Spawns a game loop over `scenes` and builds the router the same way
/// `main.rs` does, with a deterministic RNG, clock, and store.
pub fn spawn_test_game(config: GameConfig, scenes: Vec<Scene>) -> TestGame {
    let store = Arc::new(InMemoryProgressStore::default());
    let (input_tx, input_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(GameSnapshot::initial(&config.score));
    let score_config = config.score.clone();

    let mut flow = GameFlowBuilder::new()
        .config(config)
        .scene_bank(SceneBank::from_scenes(scenes, Box::new(MockRng)).unwrap())
        .presenter(Box::new(SnapshotPresenter::new(snapshot_tx.clone())))
        .inputs(input_rx)
        .progress_store(store.clone())
        .clock(Arc::new(FixedClock::default()))
        .build()
        .unwrap();
    spawn_score_observer(flow.subscribe_score(), snapshot_tx, score_config);
    tokio::spawn(async move { flow.run().await });

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/game", routes::game::router())
        .with_state(AppState::new(input_tx, snapshot_rx));

    TestGame { app, store }
}

/// Send a request and return the status and JSON body.
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with an optional JSON body.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method("POST").uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Polls the game snapshot until `ready` accepts it.
pub async fn wait_for_snapshot<F>(app: &Router, ready: F) -> serde_json::Value
where
    F: Fn(&serde_json::Value) -> bool,
{
    for _ in 0..1000 {
        let (status, json) = get_json(app, "/api/v1/game").await;
        assert_eq!(status, StatusCode::OK);
        if ready(&json) {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("snapshot never reached the expected state");
}
