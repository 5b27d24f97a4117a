//! Realtime event catalog for Taskdeck.
//!
//! Defines the server-to-client [`ServerEvent`] enum and the
//! client-to-server [`ClientCommand`] enum, plus JSON encode/decode
//! functions. Events travel as WebSocket text frames shaped
//! `{"event": "...", "data": {...}}`; commands as
//! `{"command": "...", ...}`. The event names are a wire contract shared
//! with browser clients and must not change.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Board, List, Task};

/// Error type for event/command encode and decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Events fanned out to realtime sessions after a successful mutation.
///
/// Scope: `BoardCreated` and `BoardDeleted` are broadcast to every
/// connected session (recipients may not be in the board's room yet, or
/// the room is being torn down); everything else goes to the affected
/// board's room only. Delivery is at-most-once, best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// A board was created. Global broadcast.
    BoardCreated { board: Board },
    /// A board's name or member set changed.
    BoardUpdated { board: Board },
    /// A board and all its contents were deleted. Global broadcast.
    BoardDeleted { board_id: Uuid },
    /// A list was created in the board.
    ListCreated { list: List },
    /// A list's title or position changed.
    ListUpdated { list: List },
    /// A list and its tasks were deleted.
    ListDeleted { list_id: Uuid },
    /// A task was created.
    TaskCreated { task: Task },
    /// A task's fields changed (not a move).
    TaskUpdated { task: Task },
    /// A task was moved, possibly across lists.
    TaskMoved {
        task_id: Uuid,
        old_list_id: Uuid,
        new_list_id: Uuid,
        position: i64,
    },
    /// A task was deleted.
    TaskDeleted { task_id: Uuid },
    /// A user was assigned to a task.
    TaskAssigned { task_id: Uuid, assignee_id: Uuid },
    /// A user was unassigned from a task.
    TaskUnassigned { task_id: Uuid, assignee_id: Uuid },
    /// A member was added to the board.
    MemberAdded { board_id: Uuid, member_id: Uuid },
    /// A member was removed from the board.
    MemberRemoved { board_id: Uuid, member_id: Uuid },
}

/// Commands a realtime session sends to manage its room subscriptions.
///
/// Join and leave are explicit client-initiated operations, independent
/// of any HTTP request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Subscribe this session to the board's room.
    JoinBoard { board_id: Uuid },
    /// Unsubscribe this session from the board's room.
    LeaveBoard { board_id: Uuid },
}

/// Encodes a [`ServerEvent`] as a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if the event cannot be serialized.
pub fn encode_event(event: &ServerEvent) -> Result<String, CodecError> {
    serde_json::to_string(event).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a [`ServerEvent`] from a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if the text is not a valid event.
pub fn decode_event(text: &str) -> Result<ServerEvent, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a [`ClientCommand`] from a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if the text is not a valid command.
pub fn decode_command(text: &str) -> Result<ClientCommand, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Encodes a [`ClientCommand`] as a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if the command cannot be serialized.
pub fn encode_command(command: &ClientCommand) -> Result<String, CodecError> {
    serde_json::to_string(command).map_err(|e| CodecError::Serialization(e.to_string()))
}
