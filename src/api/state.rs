//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::websocket::{HubConfig, SessionHub};

/// Shared application state for all handlers
///
/// Holds configuration and bookkeeping only. Reading state lives in each
/// WebSocket session.
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Registry of live dashboard sessions
    pub hub: Arc<SessionHub>,
    /// Timer source for session ticks
    pub scheduler: Arc<dyn Scheduler + Send + Sync>,
}

impl AppState {
    /// Create state that ticks sessions on the Tokio timer
    pub fn new(config: Config) -> Self {
        Self::with_scheduler(config, Arc::new(TokioScheduler::new()))
    }

    /// Create state with a custom scheduler
    pub fn with_scheduler(config: Config, scheduler: Arc<dyn Scheduler + Send + Sync>) -> Self {
        let hub_config = HubConfig {
            max_sessions: config.server.max_sessions,
        };

        Self {
            config: Arc::new(config),
            start_time: Instant::now(),
            hub: Arc::new(SessionHub::new(hub_config)),
            scheduler,
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get live session count
    pub async fn session_count(&self) -> usize {
        self.hub.session_count().await
    }
}
