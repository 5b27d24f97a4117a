//! Board CRUD and membership.
//!
//! Any member may read; only the owner may rename, change membership, or
//! delete. Board creation and deletion broadcast globally since the
//! audience is not yet (or no longer) in the board's room.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use taskdeck_proto::event::ServerEvent;
use taskdeck_proto::model::{ActivityKind, Board, MAX_BOARD_NAME_LENGTH};

use crate::access::{self, require_owner};
use crate::activity;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::views;
use crate::response;
use crate::validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBoardRequest {
    pub name: Option<String>,
    pub members: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// `POST /api/boards`
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateBoardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate::length("name", &req.name, 1, MAX_BOARD_NAME_LENGTH)?;

    let board = Board::new(req.name, user.id);
    state.store.insert_board(board.clone()).await;
    tracing::info!(board_id = %board.id, owner = %user.id, "board created");

    activity::record(
        &state.store,
        ActivityKind::BoardCreated,
        user.id,
        board.id,
        None,
        format!("Board \"{}\" created", board.name),
    )
    .await;
    state
        .rooms
        .broadcast_all(&ServerEvent::BoardCreated {
            board: board.clone(),
        })
        .await;

    let summary = views::board_summary(&state.store, &board).await;
    Ok(response::created(
        "board created successfully",
        json!({ "board": summary }),
    ))
}

/// `GET /api/boards`
pub async fn index(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let mut boards = state.store.boards_for_user(user.id).await;
    boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut summaries = Vec::with_capacity(boards.len());
    for board in &boards {
        summaries.push(views::board_summary(&state.store, board).await);
    }
    Ok(response::ok(json!({ "boards": summaries })))
}

/// `GET /api/boards/{id}`
pub async fn show(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (board, _) = access::board_access(&state.store, id, user.id).await?;
    let view = views::board_view(&state.store, &board).await;
    Ok(response::ok(json!({ "board": view })))
}

/// `PUT /api/boards/{id}`
///
/// Patch semantics: absent fields stay unchanged. A supplied `members`
/// array replaces the set wholesale, exactly as given: the owner is not
/// re-inserted on update, only at creation.
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBoardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, role) = access::board_access(&state.store, id, user.id).await?;
    require_owner(role, "update the board")?;
    if let Some(name) = &req.name {
        validate::length("name", name, 1, MAX_BOARD_NAME_LENGTH)?;
    }

    let board = state
        .store
        .update_board(id, |b| {
            if let Some(name) = req.name {
                b.name = name;
            }
            if let Some(members) = req.members {
                b.members = members;
            }
            b.updated_at = Utc::now();
        })
        .await
        .ok_or(ApiError::NotFound("Board"))?;

    activity::record(
        &state.store,
        ActivityKind::BoardUpdated,
        user.id,
        board.id,
        None,
        format!("Board \"{}\" updated", board.name),
    )
    .await;
    state
        .rooms
        .broadcast_board(
            id,
            &ServerEvent::BoardUpdated {
                board: board.clone(),
            },
        )
        .await;

    let summary = views::board_summary(&state.store, &board).await;
    Ok(response::ok_with(
        "board updated successfully",
        json!({ "board": summary }),
    ))
}

/// `DELETE /api/boards/{id}`
///
/// Cascade is leaf-first (tasks, lists, activities, board) so a crash
/// mid-cascade can only orphan leaf data, never leave a parent pointing
/// at a deleted child.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, role) = access::board_access(&state.store, id, user.id).await?;
    require_owner(role, "delete the board")?;

    let list_ids: Vec<Uuid> = state
        .store
        .lists_for_board(id)
        .await
        .iter()
        .map(|l| l.id)
        .collect();
    let tasks_removed = state.store.remove_tasks_for_lists(&list_ids).await;
    state.store.remove_lists_for_board(id).await;
    state.store.remove_activities_for_board(id).await;
    state.store.remove_board(id).await;
    tracing::info!(
        board_id = %id,
        lists = list_ids.len(),
        tasks = tasks_removed,
        "board deleted"
    );

    state
        .rooms
        .broadcast_all(&ServerEvent::BoardDeleted { board_id: id })
        .await;
    state.rooms.remove_room(id).await;

    Ok(response::ok_message("board deleted successfully"))
}

/// `POST /api/boards/{id}/members`
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (board, role) = access::board_access(&state.store, id, user.id).await?;
    require_owner(role, "add members")?;
    if board.members.contains(&req.user_id) {
        return Err(ApiError::Conflict("user is already a member".to_string()));
    }

    let board = state
        .store
        .update_board(id, |b| {
            b.members.push(req.user_id);
            b.updated_at = Utc::now();
        })
        .await
        .ok_or(ApiError::NotFound("Board"))?;

    activity::record(
        &state.store,
        ActivityKind::MemberAdded,
        user.id,
        id,
        None,
        format!("Member added to board \"{}\"", board.name),
    )
    .await;
    state
        .rooms
        .broadcast_board(
            id,
            &ServerEvent::MemberAdded {
                board_id: id,
                member_id: req.user_id,
            },
        )
        .await;

    let summary = views::board_summary(&state.store, &board).await;
    Ok(response::ok_with(
        "member added successfully",
        json!({ "board": summary }),
    ))
}

/// `DELETE /api/boards/{id}/members/{member_id}`
///
/// Idempotent: removing an absent member succeeds and changes nothing.
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, role) = access::board_access(&state.store, id, user.id).await?;
    require_owner(role, "remove members")?;

    let board = state
        .store
        .update_board(id, |b| {
            b.members.retain(|m| *m != member_id);
            b.updated_at = Utc::now();
        })
        .await
        .ok_or(ApiError::NotFound("Board"))?;

    activity::record(
        &state.store,
        ActivityKind::MemberRemoved,
        user.id,
        id,
        None,
        format!("Member removed from board \"{}\"", board.name),
    )
    .await;
    state
        .rooms
        .broadcast_board(
            id,
            &ServerEvent::MemberRemoved {
                board_id: id,
                member_id,
            },
        )
        .await;

    Ok(response::ok_message("member removed successfully"))
}
