//! WebSocket Message Types
//!
//! Defines all message types exchanged between a dashboard page and its
//! server-side session.

use serde::{Deserialize, Serialize};

use crate::views::DashboardView;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Re-send the current view without waiting for the next tick
    Snapshot,
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session established
    Connected {
        /// Unique session identifier
        session_id: String,
        /// Seconds between updates
        update_interval_secs: f64,
        /// Rolling window size
        history_max_length: usize,
    },
    /// Freshly rendered dashboard
    Update {
        view: DashboardView,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}
