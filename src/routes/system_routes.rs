use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::config::AppConfig;
use crate::state::leaderboard::SharedLeaderboard;

#[derive(Clone)]
struct SystemState {
    config: AppConfig,
    board: SharedLeaderboard,
}

pub fn routes(config: AppConfig, board: SharedLeaderboard) -> Router {
    Router::new()
        .route("/alive", get(is_alive))
        .route("/version", get(version))
        .route("/stats", get(stats))
        .with_state(SystemState { config, board })
}

/// GET /system/alive
async fn is_alive() -> &'static str {
    "OK"
}

/// GET /system/version
async fn version(State(state): State<SystemState>) -> Json<serde_json::Value> {
    Json(json!({
        "version": state.config.server_version
    }))
}

/// GET /system/stats
async fn stats(State(state): State<SystemState>) -> Json<serde_json::Value> {
    Json(json!({
        "entries": state.board.len(),
        "empty": state.board.is_empty(),
        "capacity": state.board.capacity(),
    }))
}
