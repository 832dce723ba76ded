//! Dashboard Routes
//!
//! - GET /api/v1/config - Effective dashboard settings
//! - GET /api/v1/preview - Render a throwaway session without a WebSocket

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ConfigResponse, PreviewParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::session::{DashboardSession, SessionConfig};
use crate::views::DashboardView;

/// Upper bound on ticks a single preview may run
pub const MAX_PREVIEW_READINGS: usize = 1000;

/// GET /api/v1/config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        dashboard: state.config.dashboard.clone(),
    })
}

/// GET /api/v1/preview?readings=N&seed=S
///
/// Builds a fresh, independent session, ticks it `N` times without waiting
/// on the timer and returns the rendered page.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PreviewParams>,
) -> ApiResult<Json<DashboardView>> {
    let readings = params
        .readings
        .unwrap_or(state.config.dashboard.history_max_length);
    if readings > MAX_PREVIEW_READINGS {
        return Err(ApiError::Validation(format!(
            "readings must be at most {}, got {}",
            MAX_PREVIEW_READINGS, readings
        )));
    }

    let mut config = SessionConfig::from(&state.config.dashboard);
    if let Some(seed) = params.seed {
        config = config.with_seed(seed);
    }

    let mut session = DashboardSession::new(config)?;
    for _ in 0..readings {
        session.tick();
    }

    tracing::debug!(readings, "Rendered preview");
    Ok(Json(session.view()))
}
