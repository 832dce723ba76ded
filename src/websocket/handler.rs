//! WebSocket Handler
//!
//! Each upgraded connection gets its own [`DashboardSession`]: a private
//! generator and store, ticked by the server's scheduler. Every store
//! notification is rendered and pushed to the page.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::hub::{SessionHub, SESSION_QUEUE_CAPACITY};
use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::session::{self, DashboardSession, SessionConfig, SharedSession};
use crate::views::DashboardView;

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let session_config = SessionConfig::from(&state.config.dashboard);
    let mut dashboard = match DashboardSession::new(session_config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create dashboard session");
            send_error(&mut sender, e.to_string()).await;
            return;
        }
    };

    // Bounded so a stalled page cannot grow the queue without limit
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(SESSION_QUEUE_CAPACITY);

    let hub = Arc::clone(&state.hub);
    let session_id = match hub.register(tx.clone()).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected WebSocket session");
            send_error(&mut sender, e.to_string()).await;
            return;
        }
    };

    let connected_msg = ServerMessage::Connected {
        session_id: session_id.clone(),
        update_interval_secs: session_config.update_interval.as_secs_f64(),
        history_max_length: session_config.history_max_length,
    };
    let sent = match encode(&connected_msg) {
        Some(text) => sender.send(Message::Text(text)).await.is_ok(),
        None => false,
    };
    if !sent {
        tracing::error!(session_id = %session_id, "Failed to send connected message");
        hub.unregister(&session_id).await;
        return;
    }

    // Every tick renders the page and queues it for this socket only
    let sid_for_updates = session_id.clone();
    dashboard.subscribe_view(move |view| {
        queue_update(&tx, &sid_for_updates, view);
    });
    let dashboard = dashboard.into_shared();
    let mut ticker = DashboardSession::start(&dashboard, state.scheduler.as_ref());

    let sid_for_send = session_id.clone();

    // Task to forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Some(text) = encode(&msg) else { continue };
            if sender.send(Message::Text(text)).await.is_err() {
                tracing::debug!(
                    session_id = %sid_for_send,
                    "WebSocket send failed, closing session"
                );
                break;
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let sid_for_recv = session_id.clone();
    let dashboard_for_recv = Arc::clone(&dashboard);

    // Task to receive messages from WebSocket and handle them
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &sid_for_recv, &dashboard_for_recv, msg)
                        .await
                    {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        session_id = %sid_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    // Cleanup: stop the timer, drop the session, unregister from hub
    ticker.cancel();
    let recorded = session::lock(&dashboard).snapshot().total_recorded;
    tracing::debug!(session_id = %session_id, recorded, "Session timer stopped");
    hub.unregister(&session_id).await;
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(
    hub: &SessionHub,
    session_id: &str,
    dashboard: &SharedSession,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    handle_client_message(hub, session_id, dashboard, client_msg).await;
                }
                Err(e) => {
                    tracing::debug!(
                        session_id = %session_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    // Send error but keep connection open
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(session_id, error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(session_id, error_msg).await;
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(session_id = %session_id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message
async fn handle_client_message(
    hub: &SessionHub,
    session_id: &str,
    dashboard: &SharedSession,
    message: ClientMessage,
) {
    let response = match message {
        ClientMessage::Snapshot => {
            let view = session::lock(dashboard).view();
            ServerMessage::Update { view }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    };

    if let Err(e) = hub.send_to(session_id, response).await {
        tracing::debug!(session_id = %session_id, error = %e, "Reply dropped");
    }
}

/// Queue a rendered view, dropping it when the page is not keeping up
///
/// Returns whether the update was queued.
fn queue_update(tx: &mpsc::Sender<ServerMessage>, session_id: &str, view: DashboardView) -> bool {
    match tx.try_send(ServerMessage::Update { view }) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::trace!(session_id = %session_id, "Send queue full, update dropped");
            false
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

fn encode(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

async fn send_error<S>(sender: &mut S, message: String)
where
    S: SinkExt<Message> + Unpin,
{
    if let Some(text) = encode(&ServerMessage::Error { message }) {
        let _ = sender.send(Message::Text(text)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::config::Config;
    use crate::scheduler::ManualScheduler;
    use crate::store::ReactiveStore;
    use crate::reading::TemperatureUnit;
    use serde_json::Value;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::{
        connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
    };

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    const WAIT: Duration = Duration::from_secs(5);

    async fn spawn_server(scheduler: ManualScheduler) -> SocketAddr {
        let state = AppState::with_scheduler(Config::default(), Arc::new(scheduler));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        addr
    }

    async fn connect(addr: SocketAddr) -> Client {
        let (client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
        client
    }

    /// Next text frame, parsed as JSON
    async fn next_json(client: &mut Client) -> Value {
        loop {
            let frame = tokio::time::timeout(WAIT, client.next())
                .await
                .expect("timed out waiting for a message")
                .expect("socket closed")
                .unwrap();
            if let WsMessage::Text(text) = frame {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    async fn send_json(client: &mut Client, text: &str) {
        client.send(WsMessage::Text(text.to_string())).await.unwrap();
    }

    /// Wait until `n` sessions have started their timers
    async fn wait_for_timers(scheduler: &ManualScheduler, n: usize) {
        tokio::time::timeout(WAIT, async {
            while scheduler.active() != n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("session timers never started");
    }

    #[tokio::test]
    async fn test_each_connection_owns_its_session() {
        let scheduler = ManualScheduler::new();
        let addr = spawn_server(scheduler.clone()).await;

        let mut first = connect(addr).await;
        let mut second = connect(addr).await;

        let hello_first = next_json(&mut first).await;
        let hello_second = next_json(&mut second).await;
        assert_eq!(hello_first["type"], "connected");
        assert_eq!(hello_second["type"], "connected");
        assert_eq!(hello_first["history_max_length"], 20);
        assert_ne!(hello_first["session_id"], hello_second["session_id"]);

        wait_for_timers(&scheduler, 2).await;
        assert_eq!(scheduler.advance(), 2);

        for client in [&mut first, &mut second] {
            let update = next_json(client).await;
            assert_eq!(update["type"], "update");
            assert_eq!(update["view"]["state"], "populated");
            assert_eq!(update["view"]["total_recorded"], 1);
            assert_eq!(update["view"]["readings"].as_array().unwrap().len(), 1);
        }

        // A late joiner starts from an empty store of its own
        let mut third = connect(addr).await;
        assert_eq!(next_json(&mut third).await["type"], "connected");
        wait_for_timers(&scheduler, 3).await;
        scheduler.advance();

        assert_eq!(next_json(&mut first).await["view"]["total_recorded"], 2);
        assert_eq!(next_json(&mut second).await["view"]["total_recorded"], 2);
        assert_eq!(next_json(&mut third).await["view"]["total_recorded"], 1);
    }

    #[tokio::test]
    async fn test_snapshot_and_ping_replies() {
        let scheduler = ManualScheduler::new();
        let addr = spawn_server(scheduler.clone()).await;
        let mut client = connect(addr).await;
        assert_eq!(next_json(&mut client).await["type"], "connected");

        send_json(&mut client, r#"{"type":"snapshot"}"#).await;
        let update = next_json(&mut client).await;
        assert_eq!(update["type"], "update");
        assert_eq!(update["view"]["state"], "empty");
        assert_eq!(update["view"]["current_temperature"], "--");

        send_json(&mut client, r#"{"type":"ping"}"#).await;
        assert_eq!(next_json(&mut client).await["type"], "pong");

        send_json(&mut client, r#"{"type":"subscribe"}"#).await;
        assert_eq!(next_json(&mut client).await["type"], "error");
    }

    #[tokio::test]
    async fn test_closing_stops_the_session_timer() {
        let scheduler = ManualScheduler::new();
        let addr = spawn_server(scheduler.clone()).await;
        let mut client = connect(addr).await;
        assert_eq!(next_json(&mut client).await["type"], "connected");
        wait_for_timers(&scheduler, 1).await;

        client.close(None).await.unwrap();
        wait_for_timers(&scheduler, 0).await;
    }

    #[test]
    fn test_queue_update_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let view = DashboardView::render(
            &ReactiveStore::new(3).snapshot(),
            TemperatureUnit::Fahrenheit,
        );

        assert!(queue_update(&tx, "s", view.clone()));
        assert!(!queue_update(&tx, "s", view.clone()));

        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Update { .. })));
        assert!(rx.try_recv().is_err());
        assert!(queue_update(&tx, "s", view.clone()));

        drop(rx);
        assert!(!queue_update(&tx, "s", view));
    }
}
