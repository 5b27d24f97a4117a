//! WebSocket session lifecycle.
//!
//! Each connection gets a server-assigned session id and a writer task
//! fed by an unbounded channel; the reader loop processes `joinBoard` /
//! `leaveBoard` commands until the client disconnects, after which the
//! session is removed from the registry and every room it joined.
//!
//! Sessions carry no identity: events only restate mutations whose
//! payloads are already served over the authenticated HTTP surface.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use taskdeck_proto::event::{self, ClientCommand};

use crate::AppState;

/// axum handler that upgrades an HTTP request to a realtime session.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handles one upgraded WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::now_v7();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Channel feeding this session's WebSocket writer.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    state.rooms.register_session(session_id, tx).await;
    tracing::info!(session_id = %session_id, "realtime session connected");

    let mut write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                tracing::warn!(session_id = %session_id, "WebSocket write failed");
                break;
            }
        }
    });

    let reader_state = Arc::clone(&state);
    let mut read_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_command(session_id, text.as_str(), &reader_state).await;
                }
                Message::Close(_) => {
                    tracing::info!(session_id = %session_id, "received close frame");
                    break;
                }
                _ => {
                    // Ignore binary, ping, pong frames.
                }
            }
        }
    });

    // Wait for either task to finish, then abort the other.
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
        }
        _ = &mut write_task => {
            read_task.abort();
        }
    }

    state.rooms.unregister_session(session_id).await;
    tracing::info!(session_id = %session_id, "realtime session disconnected");
}

/// Applies one client command to the room registry.
async fn handle_command(session_id: Uuid, text: &str, state: &Arc<AppState>) {
    let command = match event::decode_command(text) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "failed to decode command");
            return;
        }
    };

    match command {
        ClientCommand::JoinBoard { board_id } => {
            let joined = state.rooms.join(board_id, session_id).await;
            tracing::debug!(
                session_id = %session_id,
                board_id = %board_id,
                joined = joined,
                "join board"
            );
        }
        ClientCommand::LeaveBoard { board_id } => {
            state.rooms.leave(board_id, session_id).await;
            tracing::debug!(
                session_id = %session_id,
                board_id = %board_id,
                "leave board"
            );
        }
    }
}
