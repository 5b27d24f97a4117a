//! List CRUD within a board. Any board member may mutate lists.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use taskdeck_proto::event::ServerEvent;
use taskdeck_proto::model::{ActivityKind, List, MAX_LIST_TITLE_LENGTH};

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
pub struct CreateListRequest {
    pub title: String,
    pub position: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateListRequest {
    pub title: Option<String>,
    pub position: Option<i64>,
}

/// `POST /api/boards/{board_id}/lists`
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CreateListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    access::board_access(&state.store, board_id, user.id).await?;
    validate::length("title", &req.title, 1, MAX_LIST_TITLE_LENGTH)?;

    let position = match req.position {
        Some(p) => p,
        None => ordering::next_position(&state.store.lists_for_board(board_id).await),
    };
    let list = List::new(req.title, board_id, position);
    state.store.insert_list(list.clone()).await;
    state
        .store
        .update_board(board_id, |b| b.lists.push(list.id))
        .await;
    tracing::info!(list_id = %list.id, board_id = %board_id, position = position, "list created");

    activity::record(
        &state.store,
        ActivityKind::ListCreated,
        user.id,
        board_id,
        None,
        format!("List \"{}\" created", list.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(board_id, &ServerEvent::ListCreated { list: list.clone() })
        .await;

    Ok(response::created(
        "list created successfully",
        json!({ "list": list }),
    ))
}

/// `GET /api/boards/{board_id}/lists`
pub async fn index(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    access::board_access(&state.store, board_id, user.id).await?;

    let mut lists = state.store.lists_for_board(board_id).await;
    ordering::sort_for_display(&mut lists);
    let mut list_views = Vec::with_capacity(lists.len());
    for list in &lists {
        list_views.push(views::list_view(&state.store, list).await);
    }
    Ok(response::ok(json!({ "lists": list_views })))
}

/// `PUT /api/boards/list/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    access::list_access(&state.store, id, user.id).await?;
    if let Some(title) = &req.title {
        validate::length("title", title, 1, MAX_LIST_TITLE_LENGTH)?;
    }

    let list = state
        .store
        .update_list(id, |l| {
            if let Some(title) = req.title {
                l.title = title;
            }
            if let Some(position) = req.position {
                l.position = position;
            }
        })
        .await
        .ok_or(ApiError::NotFound("List"))?;

    activity::record(
        &state.store,
        ActivityKind::ListUpdated,
        user.id,
        list.board,
        None,
        format!("List \"{}\" updated", list.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(list.board, &ServerEvent::ListUpdated { list: list.clone() })
        .await;

    Ok(response::ok_with(
        "list updated successfully",
        json!({ "list": list }),
    ))
}

/// `DELETE /api/boards/list/{id}`
///
/// Deletes the list's tasks first, then unlinks the list from the board,
/// then removes the list itself.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (list, board, _) = access::list_access(&state.store, id, user.id).await?;

    let tasks_removed = state.store.remove_tasks_for_lists(&[id]).await;
    state
        .store
        .update_board(board.id, |b| b.lists.retain(|l| *l != id))
        .await;
    state.store.remove_list(id).await;
    tracing::info!(list_id = %id, board_id = %board.id, tasks = tasks_removed, "list deleted");

    activity::record(
        &state.store,
        ActivityKind::ListDeleted,
        user.id,
        board.id,
        None,
        format!("List \"{}\" deleted", list.title),
    )
    .await;
    state
        .rooms
        .broadcast_board(board.id, &ServerEvent::ListDeleted { list_id: id })
        .await;

    Ok(response::ok_message("list deleted successfully"))
}
