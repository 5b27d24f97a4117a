//! Task CRUD, drag-and-drop moves, and assignment.
//!
//! Access is always resolved transitively: task → list → board. Any
//! board member may mutate tasks.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use taskdeck_proto::event::ServerEvent;
use taskdeck_proto::model::{
    ActivityKind, MAX_DESCRIPTION_LENGTH, MAX_TASK_TITLE_LENGTH, Task,
};

use crate::access;
use crate::activity;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::views;
use crate::ordering;
use crate::response;
use crate::validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub position: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignees: Option<Vec<Uuid>>,
    pub position: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub list_id: Uuid,
    pub position: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub user_id: Uuid,
}

/// `POST /api/lists/{list_id}/tasks`
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(list_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (list, board, _) = access::list_access(&state.store, list_id, user.id).await?;
    validate::length("title", &req.title, 1, MAX_TASK_TITLE_LENGTH)?;
    let description = req.description.unwrap_or_default();
    validate::max_length("description", &description, MAX_DESCRIPTION_LENGTH)?;

    let position = match req.position {
        Some(p) => p,
        None => ordering::next_position(&state.store.tasks_for_list(list_id).await),
    };
    let task = Task::new(req.title, description, list_id, position);
    state.store.insert_task(task.clone()).await;
    state
        .store
        .update_list(list_id, |l| l.tasks.push(task.id))
        .await;
    tracing::info!(task_id = %task.id, list_id = %list_id, position = position, "task created");

    activity::record(
        &state.store,
        ActivityKind::TaskCreated,
        user.id,
        board.id,
        Some(task.id),
        format!("Task \"{}\" created in list \"{}\"", task.title, list.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(board.id, &ServerEvent::TaskCreated { task: task.clone() })
        .await;

    Ok(response::created(
        "task created successfully",
        json!({ "task": task }),
    ))
}

/// `GET /api/lists/{list_id}/tasks`
pub async fn index(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(list_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    access::list_access(&state.store, list_id, user.id).await?;

    let mut tasks = state.store.tasks_for_list(list_id).await;
    ordering::sort_for_display(&mut tasks);
    let mut task_views = Vec::with_capacity(tasks.len());
    for task in &tasks {
        task_views.push(views::task_view(&state.store, task).await);
    }
    Ok(response::ok(json!({ "tasks": task_views })))
}

/// `GET /api/lists/task/{id}`
pub async fn show(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (task, _, _) = access::task_access(&state.store, id, user.id).await?;
    let view = views::task_view(&state.store, &task).await;
    Ok(response::ok(json!({ "task": view })))
}

/// `PUT /api/lists/task/{id}`
///
/// Patch semantics: absent fields stay unchanged; an explicit empty
/// description or assignee array is a value, not an omission.
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, _, board) = access::task_access(&state.store, id, user.id).await?;
    if let Some(title) = &req.title {
        validate::length("title", title, 1, MAX_TASK_TITLE_LENGTH)?;
    }
    if let Some(description) = &req.description {
        validate::max_length("description", description, MAX_DESCRIPTION_LENGTH)?;
    }

    let task = state
        .store
        .update_task(id, |t| {
            if let Some(title) = req.title {
                t.title = title;
            }
            if let Some(description) = req.description {
                t.description = description;
            }
            if let Some(assignees) = req.assignees {
                t.assignees = assignees;
            }
            if let Some(position) = req.position {
                t.position = position;
            }
            t.updated_at = Utc::now();
        })
        .await
        .ok_or(ApiError::NotFound("Task"))?;

    activity::record(
        &state.store,
        ActivityKind::TaskUpdated,
        user.id,
        board.id,
        Some(task.id),
        format!("Task \"{}\" updated", task.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(board.id, &ServerEvent::TaskUpdated { task: task.clone() })
        .await;

    let view = views::task_view(&state.store, &task).await;
    Ok(response::ok_with(
        "task updated successfully",
        json!({ "task": view }),
    ))
}

/// `PATCH /api/lists/task/{id}/move`
///
/// Drag-and-drop resolution: access is checked on the source board and,
/// for cross-list moves, on the destination board as well. The supplied
/// position is written as-is; siblings are never renumbered.
pub async fn move_task(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (task, _, board) = access::task_access(&state.store, id, user.id).await?;
    let old_list_id = task.list;

    if req.list_id != old_list_id {
        access::list_access(&state.store, req.list_id, user.id).await?;
    }

    let moved = ordering::apply_move(&state.store, id, old_list_id, req.list_id, req.position)
        .await
        .ok_or(ApiError::NotFound("Task"))?;
    tracing::info!(
        task_id = %id,
        old_list_id = %old_list_id,
        new_list_id = %req.list_id,
        position = req.position,
        "task moved"
    );

    activity::record(
        &state.store,
        ActivityKind::TaskMoved,
        user.id,
        board.id,
        Some(id),
        format!("Task \"{}\" moved", moved.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(
            board.id,
            &ServerEvent::TaskMoved {
                task_id: id,
                old_list_id,
                new_list_id: req.list_id,
                position: moved.position,
            },
        )
        .await;

    Ok(response::ok_with(
        "task moved successfully",
        json!({ "task": moved }),
    ))
}

/// `DELETE /api/lists/task/{id}`
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (task, list, board) = access::task_access(&state.store, id, user.id).await?;

    state
        .store
        .update_list(list.id, |l| l.tasks.retain(|t| *t != id))
        .await;
    state.store.remove_task(id).await;
    tracing::info!(task_id = %id, list_id = %list.id, "task deleted");

    activity::record(
        &state.store,
        ActivityKind::TaskDeleted,
        user.id,
        board.id,
        None,
        format!("Task \"{}\" deleted", task.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(board.id, &ServerEvent::TaskDeleted { task_id: id })
        .await;

    Ok(response::ok_message("task deleted successfully"))
}

/// `POST /api/lists/task/{id}/assign`
pub async fn assign(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (task, _, board) = access::task_access(&state.store, id, user.id).await?;
    if task.assignees.contains(&req.user_id) {
        return Err(ApiError::Conflict(
            "user already assigned to this task".to_string(),
        ));
    }

    let task = state
        .store
        .update_task(id, |t| {
            t.assignees.push(req.user_id);
            t.updated_at = Utc::now();
        })
        .await
        .ok_or(ApiError::NotFound("Task"))?;

    activity::record(
        &state.store,
        ActivityKind::TaskAssigned,
        user.id,
        board.id,
        Some(id),
        format!("User assigned to task \"{}\"", task.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(
            board.id,
            &ServerEvent::TaskAssigned {
                task_id: id,
                assignee_id: req.user_id,
            },
        )
        .await;

    let view = views::task_view(&state.store, &task).await;
    Ok(response::ok_with(
        "user assigned successfully",
        json!({ "task": view }),
    ))
}

/// `DELETE /api/lists/task/{id}/assign/{user_id}`
///
/// Idempotent: unassigning an absent user succeeds and changes nothing.
pub async fn unassign(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, assignee_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, _, board) = access::task_access(&state.store, id, user.id).await?;

    let task = state
        .store
        .update_task(id, |t| {
            t.assignees.retain(|a| *a != assignee_id);
            t.updated_at = Utc::now();
        })
        .await
        .ok_or(ApiError::NotFound("Task"))?;

    activity::record(
        &state.store,
        ActivityKind::TaskUnassigned,
        user.id,
        board.id,
        Some(id),
        format!("User unassigned from task \"{}\"", task.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(
            board.id,
            &ServerEvent::TaskUnassigned {
                task_id: id,
                assignee_id,
            },
        )
        .await;

    let view = views::task_view(&state.store, &task).await;
    Ok(response::ok_with(
        "user unassigned successfully",
        json!({ "task": view }),
    ))
}
