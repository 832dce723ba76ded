//! Health Routes
//!
//! - GET /health/live - Liveness check (process is alive)
//! - GET /health/ready - Readiness check (a new session can be accepted)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// 503 once the session limit is reached, since new pages would be refused.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.session_count().await < state.hub.max_sessions() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let active_sessions = state.session_count().await;
    let max_sessions = state.hub.max_sessions();

    let status = if active_sessions < max_sessions {
        "healthy"
    } else {
        "saturated"
    };

    Json(HealthResponse {
        status: status.to_string(),
        active_sessions,
        max_sessions,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
