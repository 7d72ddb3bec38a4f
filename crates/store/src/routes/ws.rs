//! WebSocket handler for catalog notifications.
//!
//! One connection = one broadcast subscription. The client receives the
//! current catalog on connect, then every [`CatalogEvent`] as a JSON text
//! frame. Incoming client frames are drained and ignored; the channel is
//! push-only.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::broadcast::error::RecvError;

use crate::db::products::ProductRepository;
use crate::notifications::CatalogEvent;
use crate::state::AppState;

/// Upgrade the request to a WebSocket connection.
pub async fn upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pump catalog events into a connected socket until either side closes.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    // Subscribe before the snapshot so no event published in between is lost.
    let mut events = state.hub().subscribe();

    let snapshot = match ProductRepository::new(state.pool()).all().await {
        Ok(products) => CatalogEvent::Snapshot { products },
        Err(e) => {
            tracing::error!(error = %e, "failed to load catalog snapshot for ws client");
            return;
        }
    };

    if send_event(&mut socket, &snapshot).await.is_err() {
        return;
    }

    tracing::debug!("ws client connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Slow subscriber: missed events are dropped, keep going.
                    tracing::warn!(skipped, "ws client lagged behind catalog events");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Push-only channel: drain and ignore anything else.
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("ws client disconnected");
}

/// Serialize and send one event; any failure ends the connection.
async fn send_event(socket: &mut WebSocket, event: &CatalogEvent) -> Result<(), ()> {
    let text = serde_json::to_string(event).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize catalog event");
    })?;

    socket
        .send(Message::Text(text.into()))
        .await
        .map_err(|_| ())
}
