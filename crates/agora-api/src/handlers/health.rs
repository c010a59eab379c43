//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let engine = &state.realtime;

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: "ok".to_string(),
        ws_connections: engine.connections.connection_count(),
        online_users: engine.connections.user_count(),
        rooms: engine.rooms.room_count(),
        metrics: engine.metrics.snapshot(),
    }))
}
