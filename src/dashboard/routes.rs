//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

use crate::engine::board::{BoardSnapshot, LeagueBoard};
use crate::engine::orchestrator::RunState;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub boards: Vec<Arc<LeagueBoard>>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl DashboardState {
    pub fn new(boards: Vec<Arc<LeagueBoard>>) -> Self {
        Self {
            boards,
            started_at: chrono::Utc::now(),
        }
    }

    pub fn board(&self, key: &str) -> Option<&Arc<LeagueBoard>> {
        self.boards.iter().find(|b| b.key() == key)
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueSummary {
    pub key: String,
    pub name: String,
    pub degraded: bool,
    pub predictions: RunState,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}

/// GET /api/leagues
pub async fn list_leagues(State(state): State<AppState>) -> Json<Vec<LeagueSummary>> {
    let snapshots = join_all(state.boards.iter().map(|b| b.snapshot())).await;
    Json(
        snapshots
            .into_iter()
            .map(|s| LeagueSummary {
                key: s.key,
                name: s.name,
                degraded: s.degraded,
                predictions: s.predictions,
            })
            .collect(),
    )
}

/// GET /api/leagues/:key/board
pub async fn get_board(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<BoardSnapshot>, (StatusCode, Json<ErrorResponse>)> {
    match state.board(&key) {
        Some(board) => Ok(Json(board.snapshot().await)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("unknown league: {key}"),
            }),
        )),
    }
}
