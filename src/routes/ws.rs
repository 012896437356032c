//! WebSocket endpoint pushing queue lifecycle events to observers

use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::state::AppState;

/// GET /api/ws
///
/// Upgrades the connection and streams every lifecycle event as one JSON
/// text frame. Delivery is best-effort; clients keep polling the read
/// endpoints and re-fetch full state when a frame arrives.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    info!("Observer connected");
    state.metrics.inc_ws_connections();

    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.events.subscribe();

    // Task to push events to the observer
    let send_task = tokio::spawn(async move {
        loop {
            match events_rx.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(j) => j,
                        Err(e) => {
                            warn!(error = %e, "Failed to serialize event");
                            continue;
                        }
                    };

                    if sender.send(Message::Text(json.into())).await.is_err() {
                        // Observer disconnected
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    // Tolerable: the observer's polling fallback re-syncs it.
                    warn!(lagged = count, "Observer lagged, some events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    });

    // Task to receive pings/messages from the observer (keep-alive)
    let recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(Message::Ping(data)) => {
                    // Pong is handled automatically by axum
                    let _ = data;
                }
                Ok(_) => {} // Ignore other messages
                Err(_) => break,
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.metrics.dec_ws_connections();
    info!("Observer disconnected");
}
