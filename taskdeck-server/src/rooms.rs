//! Room registry for realtime fan-out.
//!
//! Maintains two maps: a global table of connected sessions, and a
//! per-board room mapping board id → subscribed session senders. Sessions
//! join and leave rooms explicitly via client commands; every successful
//! mutation fans one event out to the affected board's room (or, for
//! board creation/deletion, to every connected session).
//!
//! Delivery is at-most-once and best-effort: sends go over unbounded
//! channels, a closed channel prunes the session, and nothing is retried
//! or replayed. Room membership is ephemeral and lost on server restart.

use std::collections::{HashMap, HashSet};

use axum::extract::ws::Message;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use taskdeck_proto::event::{self, ServerEvent};

/// Sender half of a session's outbound message channel.
pub type SessionSender = mpsc::UnboundedSender<Message>;

/// In-process registry of realtime sessions and board rooms.
#[derive(Default)]
pub struct RoomRegistry {
    /// All connected sessions, for global broadcasts.
    sessions: RwLock<HashMap<Uuid, SessionSender>>,
    /// Board id → subscribed sessions.
    rooms: RwLock<HashMap<Uuid, HashMap<Uuid, SessionSender>>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connected session, storing its sender for fan-out.
    pub async fn register_session(&self, session_id: Uuid, sender: SessionSender) {
        self.sessions.write().await.insert(session_id, sender);
    }

    /// Removes a session from the global table and from every room it
    /// had joined. Called on disconnect.
    pub async fn unregister_session(&self, session_id: Uuid) {
        self.sessions.write().await.remove(&session_id);
        let mut rooms = self.rooms.write().await;
        for members in rooms.values_mut() {
            members.remove(&session_id);
        }
        rooms.retain(|_, members| !members.is_empty());
    }

    /// Subscribes a session to a board's room.
    ///
    /// Returns `false` if the session is not registered (e.g. raced its
    /// own disconnect), in which case nothing is recorded.
    pub async fn join(&self, board_id: Uuid, session_id: Uuid) -> bool {
        let Some(sender) = self.sessions.read().await.get(&session_id).cloned() else {
            return false;
        };
        let mut rooms = self.rooms.write().await;
        rooms.entry(board_id).or_default().insert(session_id, sender);
        true
    }

    /// Unsubscribes a session from a board's room. Idempotent.
    pub async fn leave(&self, board_id: Uuid, session_id: Uuid) {
        let mut rooms = self.rooms.write().await;
        if let Some(members) = rooms.get_mut(&board_id) {
            members.remove(&session_id);
            if members.is_empty() {
                rooms.remove(&board_id);
            }
        }
    }

    /// Drops a board's room entirely (board deleted).
    pub async fn remove_room(&self, board_id: Uuid) {
        self.rooms.write().await.remove(&board_id);
    }

    /// Number of sessions currently joined to a board's room.
    pub async fn room_size(&self, board_id: Uuid) -> usize {
        self.rooms
            .read()
            .await
            .get(&board_id)
            .map_or(0, HashMap::len)
    }

    /// Fans an event out to the board's room. Best-effort: encode or send
    /// failures are logged, dead sessions are pruned, and the caller never
    /// sees an error.
    pub async fn broadcast_board(&self, board_id: Uuid, event: &ServerEvent) {
        let frame = match event::encode_event(event) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(board_id = %board_id, error = %e, "failed to encode event");
                return;
            }
        };

        let mut dead: HashSet<Uuid> = HashSet::new();
        {
            let rooms = self.rooms.read().await;
            let Some(members) = rooms.get(&board_id) else {
                return;
            };
            tracing::debug!(
                board_id = %board_id,
                sessions = members.len(),
                "broadcasting event to room"
            );
            for (session_id, sender) in members {
                if sender.send(Message::Text(frame.clone().into())).is_err() {
                    dead.insert(*session_id);
                }
            }
        }
        self.prune(&dead).await;
    }

    /// Fans an event out to every connected session (board created or
    /// deleted, where recipients may not be in the room). Best-effort.
    pub async fn broadcast_all(&self, event: &ServerEvent) {
        let frame = match event::encode_event(event) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode event");
                return;
            }
        };

        let mut dead: HashSet<Uuid> = HashSet::new();
        {
            let sessions = self.sessions.read().await;
            for (session_id, sender) in sessions.iter() {
                if sender.send(Message::Text(frame.clone().into())).is_err() {
                    dead.insert(*session_id);
                }
            }
        }
        self.prune(&dead).await;
    }

    /// Removes sessions whose channels have closed.
    async fn prune(&self, dead: &HashSet<Uuid>) {
        if dead.is_empty() {
            return;
        }
        tracing::debug!(count = dead.len(), "pruning dead sessions");
        for session_id in dead {
            self.unregister_session(*session_id).await;
        }
    }
}
