use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::services::score_service::{self, ScoreView};
use crate::state::leaderboard::SharedLeaderboard;

/// Build the score routes under /api
pub fn routes(board: SharedLeaderboard) -> Router {
    Router::new()
        .route("/scores", post(submit_score))
        .route("/leaderboard", get(get_leaderboard))
        .with_state(board)
}

//
// ─────────────────────────────────────────────────────────────
// POST /api/scores
// Record a score; 201 on success, 400 on a bad body
// ─────────────────────────────────────────────────────────────
//
async fn submit_score(
    State(board): State<SharedLeaderboard>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError>
{
    score_service::submit(&board, &body)?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "success" }))))
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/leaderboard
// Current top entries, highest first
// ─────────────────────────────────────────────────────────────
//
async fn get_leaderboard(
    State(board): State<SharedLeaderboard>,
) -> Json<Vec<ScoreView>>
{
    Json(score_service::top_scores(&board))
}
