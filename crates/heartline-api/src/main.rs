//! Heartline API server entry point.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use heartline_api::error::AppError;
use heartline_api::presenter::{GameSnapshot, SnapshotPresenter, spawn_score_observer};
use heartline_api::routes;
use heartline_api::state::AppState;
use heartline_content::application::bank::SceneBank;
use heartline_content::application::loader::load_scenes;
use heartline_core::config::GameConfig;
use heartline_core::rng::{DeterministicRng, SeededRng};
use heartline_flow::application::builder::GameFlowBuilder;
use heartline_store::json_file_progress_store::JsonFileProgressStore;
use tokio::sync::{mpsc, watch};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const INPUT_CAPACITY: usize = 32;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Heartline API server");

    // Read configuration from environment.
    let config = match std::env::var("HEARTLINE_CONFIG") {
        Ok(path) => GameConfig::load(Path::new(&path))?,
        Err(_) => GameConfig::default(),
    };
    let content_path = std::env::var("HEARTLINE_CONTENT").map_err(|_| {
        AppError::Config("HEARTLINE_CONTENT environment variable must be set".to_string())
    })?;
    let save_path =
        std::env::var("HEARTLINE_SAVE").unwrap_or_else(|_| "heartline-save.json".to_string());
    let rng: Box<dyn DeterministicRng> = match std::env::var("HEARTLINE_SEED") {
        Ok(seed) => {
            let seed = seed
                .parse()
                .map_err(|e| AppError::Config(format!("HEARTLINE_SEED must be a u64: {e}")))?;
            Box::new(SeededRng::from_seed(seed))
        }
        Err(_) => Box::new(SeededRng::from_entropy()),
    };
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Load content.
    let scenes = load_scenes(Path::new(&content_path))?;
    let bank = SceneBank::from_scenes(scenes, rng)?;
    tracing::info!(scenes = bank.len(), content = %content_path, "content loaded");

    // Wire the game loop.
    let (input_tx, input_rx) = mpsc::channel(INPUT_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(GameSnapshot::initial(&config.score));
    let score_config = config.score.clone();
    let mut flow = GameFlowBuilder::new()
        .config(config)
        .scene_bank(bank)
        .presenter(Box::new(SnapshotPresenter::new(snapshot_tx.clone())))
        .inputs(input_rx)
        .progress_store(Arc::new(JsonFileProgressStore::new(save_path)))
        .build()?;
    spawn_score_observer(flow.subscribe_score(), snapshot_tx, score_config);
    tokio::spawn(async move {
        match flow.run().await {
            Ok(()) => tracing::info!("game loop finished"),
            Err(err) => tracing::error!(%err, "game loop stopped"),
        }
    });

    let app_state = AppState::new(input_tx, snapshot_rx);

    // Build router.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/game", routes::game::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
