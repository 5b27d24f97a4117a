//! Domain model types for Taskdeck.
//!
//! All entities are identified by UUID v7, so ids are time-ordered and a
//! plain id sort doubles as a creation-order sort. Timestamps are UTC.
//! Field limits mirror the server-side validation contract and are exposed
//! here so clients can pre-validate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum allowed username length in characters.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Maximum allowed username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 30;
/// Minimum allowed password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum allowed board name length in characters.
pub const MAX_BOARD_NAME_LENGTH: usize = 100;
/// Maximum allowed list title length in characters.
pub const MAX_LIST_TITLE_LENGTH: usize = 100;
/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 200;
/// Maximum allowed task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// A registered user account.
///
/// The credential hash never leaves the server: it is skipped during
/// serialization and [`PublicUser`] is the outward projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 hash of the password. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The outward-facing projection of a [`User`] (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// A top-level shared workspace owned by one user.
///
/// The owner is inserted into `members` at creation time. `lists` is the
/// reference sequence of the board's lists; display order is nonetheless
/// always derived by sorting lists on their `position` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    /// Owning user. Immutable after creation.
    pub owner: Uuid,
    pub members: Vec<Uuid>,
    pub lists: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates a board owned by `owner`, who becomes its first member.
    #[must_use]
    pub fn new(name: String, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            owner,
            members: vec![owner],
            lists: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user` may act on this board (owner or member).
    #[must_use]
    pub fn is_accessible_by(&self, user: Uuid) -> bool {
        self.owner == user || self.members.contains(&user)
    }
}

/// A named, ordered column of tasks within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    pub title: String,
    /// Owning board. Immutable after creation.
    pub board: Uuid,
    /// Integer ranking key among the board's lists. Sparse, not dense.
    pub position: i64,
    pub tasks: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl List {
    /// Creates an empty list in `board` at `position`.
    #[must_use]
    pub fn new(title: String, board: Uuid, position: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            title,
            board,
            position,
            tasks: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A unit of work within a list.
///
/// `list` changes when the task is moved. `position` is an absolute rank,
/// assigned directly on move without renumbering siblings; duplicates tie-
/// break by creation order when sorting for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Owning list. Mutable: rewritten on cross-list moves.
    pub list: Uuid,
    /// Integer ranking key among the list's tasks. Sparse, not dense.
    pub position: i64,
    pub assignees: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an unassigned task in `list` at `position`.
    #[must_use]
    pub fn new(title: String, description: String, list: Uuid, position: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title,
            description,
            list,
            position,
            assignees: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// The kind tag of an [`Activity`] entry, one per mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    BoardCreated,
    BoardUpdated,
    ListCreated,
    ListUpdated,
    ListDeleted,
    TaskCreated,
    TaskUpdated,
    TaskMoved,
    TaskDeleted,
    TaskAssigned,
    TaskUnassigned,
    MemberAdded,
    MemberRemoved,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BoardCreated => "board_created",
            Self::BoardUpdated => "board_updated",
            Self::ListCreated => "list_created",
            Self::ListUpdated => "list_updated",
            Self::ListDeleted => "list_deleted",
            Self::TaskCreated => "task_created",
            Self::TaskUpdated => "task_updated",
            Self::TaskMoved => "task_moved",
            Self::TaskDeleted => "task_deleted",
            Self::TaskAssigned => "task_assigned",
            Self::TaskUnassigned => "task_unassigned",
            Self::MemberAdded => "member_added",
            Self::MemberRemoved => "member_removed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = UnknownActivityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "board_created" => Ok(Self::BoardCreated),
            "board_updated" => Ok(Self::BoardUpdated),
            "list_created" => Ok(Self::ListCreated),
            "list_updated" => Ok(Self::ListUpdated),
            "list_deleted" => Ok(Self::ListDeleted),
            "task_created" => Ok(Self::TaskCreated),
            "task_updated" => Ok(Self::TaskUpdated),
            "task_moved" => Ok(Self::TaskMoved),
            "task_deleted" => Ok(Self::TaskDeleted),
            "task_assigned" => Ok(Self::TaskAssigned),
            "task_unassigned" => Ok(Self::TaskUnassigned),
            "member_added" => Ok(Self::MemberAdded),
            "member_removed" => Ok(Self::MemberRemoved),
            other => Err(UnknownActivityKind(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized activity kind string.
#[derive(Debug, thiserror::Error)]
#[error("unknown activity kind: {0}")]
pub struct UnknownActivityKind(pub String);

/// An immutable audit entry for one mutation.
///
/// Append-only; never updated, and only deleted as part of a board
/// cascade delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// The acting user.
    pub user: Uuid,
    /// The affected board.
    pub board: Uuid,
    /// The affected task, when the mutation targets one.
    pub task: Option<Uuid>,
    /// Free-text human-readable description of the mutation.
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Creates a new activity entry timestamped now.
    #[must_use]
    pub fn new(
        kind: ActivityKind,
        user: Uuid,
        board: Uuid,
        task: Option<Uuid>,
        details: String,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            user,
            board,
            task,
            details,
            created_at: Utc::now(),
        }
    }
}
