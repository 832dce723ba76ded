//! Data Transfer Objects
//!
//! Request and response types for the HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "saturated" (session limit reached)
    pub status: String,
    pub active_sessions: usize,
    pub max_sessions: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Effective dashboard settings, as served to the page before it connects
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    #[serde(flatten)]
    pub dashboard: DashboardConfig,
}

/// Query parameters for the one-shot preview
#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    /// Ticks to run before rendering (default: fill the window)
    #[serde(default)]
    pub readings: Option<usize>,
    /// Seed for a reproducible preview
    #[serde(default)]
    pub seed: Option<u64>,
}
