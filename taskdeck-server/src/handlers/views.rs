//! Response projections: entities with user references resolved to public
//! profiles and children nested in display order.
//!
//! Dangling references (a deleted user still listed as member or
//! assignee) are skipped rather than erroring, matching document-store
//! populate semantics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use taskdeck_proto::model::{Board, List, PublicUser, Task};

use crate::ordering;
use crate::store::Store;

/// A task with assignees resolved to public users.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub list: Uuid,
    pub position: i64,
    pub assignees: Vec<PublicUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A list with its tasks nested in display order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub id: Uuid,
    pub title: String,
    pub board: Uuid,
    pub position: i64,
    pub tasks: Vec<TaskView>,
    pub created_at: DateTime<Utc>,
}

/// A board with owner/members resolved, without its lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: Uuid,
    pub name: String,
    pub owner: Option<PublicUser>,
    pub members: Vec<PublicUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The full nested board: lists in display order, each with its tasks.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub id: Uuid,
    pub name: String,
    pub owner: Option<PublicUser>,
    pub members: Vec<PublicUser>,
    pub lists: Vec<ListView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resolves ids to public users, skipping any that no longer exist.
pub async fn public_users(store: &Store, ids: &[Uuid]) -> Vec<PublicUser> {
    let mut users = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(user) = store.user(*id).await {
            users.push(PublicUser::from(&user));
        }
    }
    users
}

pub async fn task_view(store: &Store, task: &Task) -> TaskView {
    TaskView {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        list: task.list,
        position: task.position,
        assignees: public_users(store, &task.assignees).await,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

pub async fn list_view(store: &Store, list: &List) -> ListView {
    let mut tasks = store.tasks_for_list(list.id).await;
    ordering::sort_for_display(&mut tasks);
    let mut views = Vec::with_capacity(tasks.len());
    for task in &tasks {
        views.push(task_view(store, task).await);
    }
    ListView {
        id: list.id,
        title: list.title.clone(),
        board: list.board,
        position: list.position,
        tasks: views,
        created_at: list.created_at,
    }
}

pub async fn board_summary(store: &Store, board: &Board) -> BoardSummary {
    BoardSummary {
        id: board.id,
        name: board.name.clone(),
        owner: store.user(board.owner).await.map(|u| PublicUser::from(&u)),
        members: public_users(store, &board.members).await,
        created_at: board.created_at,
        updated_at: board.updated_at,
    }
}

pub async fn board_view(store: &Store, board: &Board) -> BoardView {
    let mut lists = store.lists_for_board(board.id).await;
    ordering::sort_for_display(&mut lists);
    let mut list_views = Vec::with_capacity(lists.len());
    for list in &lists {
        list_views.push(list_view(store, list).await);
    }
    BoardView {
        id: board.id,
        name: board.name.clone(),
        owner: store.user(board.owner).await.map(|u| PublicUser::from(&u)),
        members: public_users(store, &board.members).await,
        lists: list_views,
        created_at: board.created_at,
        updated_at: board.updated_at,
    }
}
