//! WebSocket gateway for the realtime chat channel.
//!
//! `GET /ws` authenticates the handshake and upgrades to a WebSocket. Once
//! connected, the handler:
//!
//! - **Delivers events:** Registers a connection handle with the chat
//!   server and pushes every queued [`ServerEvent`] to the client as a JSON
//!   text frame.
//! - **Receives events:** Parses incoming text frames as [`ClientEvent`]
//!   and routes `send_message` through the chat server; `ping` is answered
//!   locally.
//!
//! The token travels in the `?token=` query parameter, the one place a
//! browser WebSocket client can put it. That is the only location checked;
//! a missing token or a failed verification rejects the handshake with 401
//! before any connection state exists.
//!
//! Unknown or malformed frames are logged and ignored; the connection
//! stays up. All presence bookkeeping lives in the chat server; this task
//! only owns the transport.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use mindspace_core::realtime::ConnectionHandle;
use mindspace_types::event::{ClientEvent, ServerEvent};

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for the WebSocket handshake.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// GET /ws - Authenticate and upgrade to a WebSocket connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let token = handshake_token(query)?;

    // Reject bad handshakes before the upgrade; no presence entry, no task.
    let user_id = state.chat_server.authenticate(&token).await?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(socket, state, user_id)))
}

/// Extract the handshake token from its single home, the query string.
fn handshake_token(query: WsQuery) -> Result<String, AppError> {
    query
        .token
        .ok_or_else(|| AppError::Unauthorized("Missing access token".to_string()))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between the connection's outbound
/// queue (fed by the chat server's delivery path) and incoming WebSocket
/// frames from the client. Keeping both in a single task makes the
/// channel bidirectional without shared mutable state.
async fn handle_ws_connection(socket: WebSocket, state: AppState, user_id: i64) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let handle_id = Uuid::now_v7();
    state
        .chat_server
        .register(user_id, ConnectionHandle::new(handle_id, tx.clone()));

    loop {
        tokio::select! {
            // --- Branch 1: Push queued server events to the client ---
            event = rx.recv() => {
                let Some(event) = event else {
                    // All senders dropped; nothing left to deliver.
                    break;
                };
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if ws_sender.send(Message::Text(json.into())).await.is_err() {
                            // Client disconnected
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!("Failed to serialize ServerEvent: {err}");
                    }
                }
            }

            // --- Branch 2: Process events from the client ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        process_event(&text, handle_id, &state, &tx).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        // Client disconnected
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::debug!("WebSocket receive error: {err}");
                        break;
                    }
                    // Ignore binary, ping, pong protocol frames (handled by axum/tungstenite)
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    // Unregister by handle: if the user already reconnected, their new
    // registration survives this teardown.
    state.chat_server.disconnect(handle_id);
}

/// Parse and process a single event frame from the client.
async fn process_event(
    text: &str,
    handle_id: Uuid,
    state: &AppState,
    tx: &mpsc::UnboundedSender<ServerEvent>,
) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(
                raw = %text,
                error = %err,
                "Ignoring malformed WebSocket event"
            );
            return;
        }
    };

    match event {
        ClientEvent::SendMessage {
            conversation_id,
            text,
        } => {
            state
                .chat_server
                .handle_send(handle_id, conversation_id, text)
                .await;
        }
        ClientEvent::Ping => {
            // Answered locally; pushes through the same outbound queue so
            // ordering with deliveries is preserved.
            if tx.send(ServerEvent::Pong).is_err() {
                tracing::debug!("Failed to queue pong (connection closing)");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_token_comes_from_query_only() {
        let token = handshake_token(WsQuery {
            token: Some("abc".to_string()),
        })
        .unwrap();
        assert_eq!(token, "abc");

        assert!(matches!(
            handshake_token(WsQuery { token: None }),
            Err(AppError::Unauthorized(_))
        ));
    }
}
