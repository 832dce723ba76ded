//! Session Hub
//!
//! Tracks live dashboard sessions so the server can enforce a session limit,
//! report counts and address a session by id. The hub never holds reading
//! state; each session owns its own store.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::messages::ServerMessage;

/// Unique identifier for a dashboard session
pub type SessionId = String;

/// Messages queued per session before new ones are dropped
///
/// Every update carries the whole page, so a client that falls behind loses
/// nothing by skipping updates it had no room for.
pub const SESSION_QUEUE_CAPACITY: usize = 16;

/// Registry of connected sessions
pub struct SessionHub {
    /// Active sessions: SessionId → SessionHandle
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
    /// Configuration
    config: HubConfig,
}

/// Configuration for the session hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent sessions
    pub max_sessions: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { max_sessions: 100 }
    }
}

/// Handle for sending messages to a specific session
pub struct SessionHandle {
    /// Channel sender for this session's socket
    pub sender: mpsc::Sender<ServerMessage>,
    /// When the session connected
    pub connected_at: DateTime<Utc>,
}

impl SessionHub {
    /// Create a new session hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a new session
    ///
    /// Returns the session ID on success, or an error if the session
    /// limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Result<SessionId, HubError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_sessions {
            return Err(HubError::TooManySessions(self.config.max_sessions));
        }

        let id = Uuid::new_v4().to_string();
        sessions.insert(
            id.clone(),
            SessionHandle {
                sender,
                connected_at: Utc::now(),
            },
        );

        tracing::info!(session_id = %id, active = sessions.len(), "Session started");
        Ok(id)
    }

    /// Unregister a session
    pub async fn unregister(&self, id: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.remove(id) {
            let lasted = Utc::now() - handle.connected_at;
            tracing::info!(
                session_id = %id,
                duration_secs = lasted.num_seconds(),
                active = sessions.len(),
                "Session ended"
            );
        }
    }

    /// Queue a message for a specific session without waiting
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let sessions = self.sessions.read().await;
        let handle = sessions.get(id).ok_or(HubError::SessionNotFound)?;

        handle.sender.try_send(message).map_err(HubError::from)
    }

    /// Get the current session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn max_sessions(&self) -> usize {
        self.config.max_sessions
    }
}

/// Errors that can occur in the session hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many sessions (limit: {0})")]
    TooManySessions(usize),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Failed to send message")]
    SendFailed,

    #[error("Session queue full")]
    QueueFull,
}

impl<T> From<TrySendError<T>> for HubError {
    fn from(err: TrySendError<T>) -> Self {
        match err {
            TrySendError::Full(_) => HubError::QueueFull,
            TrySendError::Closed(_) => HubError::SendFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(HubConfig::default().max_sessions, 100);
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = SessionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::channel(SESSION_QUEUE_CAPACITY);

        let id = hub.register(tx).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.session_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_session_limit() {
        let hub = SessionHub::new(HubConfig { max_sessions: 2 });

        let (tx1, _) = mpsc::channel(SESSION_QUEUE_CAPACITY);
        let (tx2, _) = mpsc::channel(SESSION_QUEUE_CAPACITY);
        let (tx3, _) = mpsc::channel(SESSION_QUEUE_CAPACITY);

        let id1 = hub.register(tx1).await.unwrap();
        let id2 = hub.register(tx2).await.unwrap();
        let result = hub.register(tx3).await;

        assert!(matches!(result, Err(HubError::TooManySessions(2))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Too many sessions (limit: 2)"
        );

        hub.unregister(&id1).await;
        hub.unregister(&id2).await;
    }

    #[tokio::test]
    async fn test_send_to() {
        let hub = SessionHub::new(HubConfig::default());
        let (tx1, mut rx1) = mpsc::channel(SESSION_QUEUE_CAPACITY);
        let (tx2, mut rx2) = mpsc::channel(SESSION_QUEUE_CAPACITY);

        let id1 = hub.register(tx1).await.unwrap();
        let _id2 = hub.register(tx2).await.unwrap();

        hub.send_to(&id1, ServerMessage::Pong).await.unwrap();

        assert!(matches!(rx1.try_recv(), Ok(ServerMessage::Pong)));
        assert!(rx2.try_recv().is_err());

        let missing = hub.send_to("nope", ServerMessage::Pong).await;
        assert!(matches!(missing, Err(HubError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_send_to_full_queue() {
        let hub = SessionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::channel(2);
        let id = hub.register(tx).await.unwrap();

        hub.send_to(&id, ServerMessage::Pong).await.unwrap();
        hub.send_to(&id, ServerMessage::Pong).await.unwrap();
        let result = hub.send_to(&id, ServerMessage::Pong).await;
        assert!(matches!(result, Err(HubError::QueueFull)));

        // Draining makes room again
        assert!(rx.try_recv().is_ok());
        assert!(hub.send_to(&id, ServerMessage::Pong).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_to_closed_session() {
        let hub = SessionHub::new(HubConfig::default());
        let (tx, rx) = mpsc::channel(SESSION_QUEUE_CAPACITY);
        let id = hub.register(tx).await.unwrap();
        drop(rx);

        let result = hub.send_to(&id, ServerMessage::Pong).await;
        assert!(matches!(result, Err(HubError::SendFailed)));
    }
}
