//! Board access guard.
//!
//! Read-only checks resolving an identity against a board (directly, or
//! transitively through a list or task). Not-found is always reported
//! before access-denied so the two stay distinguishable at the boundary
//! (404 vs 403).

use uuid::Uuid;

use taskdeck_proto::model::{Board, List, Task};

use crate::error::ApiError;
use crate::store::Store;

/// The caller's relationship to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardRole {
    Owner,
    Member,
}

/// Resolves a user's access to a board.
///
/// # Errors
///
/// [`ApiError::NotFound`] if the board does not exist,
/// [`ApiError::Denied`] if the user is neither owner nor member.
pub async fn board_access(
    store: &Store,
    board_id: Uuid,
    user: Uuid,
) -> Result<(Board, BoardRole), ApiError> {
    let board = store.board(board_id).await.ok_or(ApiError::NotFound("Board"))?;
    let role = role_on(&board, user)?;
    Ok((board, role))
}

/// Resolves access through a list: the list must exist and the user must
/// have access to its owning board.
///
/// # Errors
///
/// [`ApiError::NotFound`] for a missing list or board, [`ApiError::Denied`]
/// for a non-member.
pub async fn list_access(
    store: &Store,
    list_id: Uuid,
    user: Uuid,
) -> Result<(List, Board, BoardRole), ApiError> {
    let list = store.list(list_id).await.ok_or(ApiError::NotFound("List"))?;
    let (board, role) = board_access(store, list.board, user).await?;
    Ok((list, board, role))
}

/// Resolves access through a task, transitively via its list's board.
///
/// # Errors
///
/// [`ApiError::NotFound`] for a missing task, list, or board,
/// [`ApiError::Denied`] for a non-member.
pub async fn task_access(
    store: &Store,
    task_id: Uuid,
    user: Uuid,
) -> Result<(Task, List, Board), ApiError> {
    let task = store.task(task_id).await.ok_or(ApiError::NotFound("Task"))?;
    let (list, board, _) = list_access(store, task.list, user).await?;
    Ok((task, list, board))
}

/// Requires the owner role, with an operation-specific denial message.
///
/// # Errors
///
/// [`ApiError::Denied`] when `role` is not [`BoardRole::Owner`].
pub fn require_owner(role: BoardRole, action: &str) -> Result<(), ApiError> {
    if role == BoardRole::Owner {
        Ok(())
    } else {
        Err(ApiError::Denied(format!("only the board owner can {action}")))
    }
}

fn role_on(board: &Board, user: Uuid) -> Result<BoardRole, ApiError> {
    if board.owner == user {
        Ok(BoardRole::Owner)
    } else if board.members.contains(&user) {
        Ok(BoardRole::Member)
    } else {
        Err(ApiError::Denied(
            "access denied, you are not a member of this board".to_string(),
        ))
    }
}
