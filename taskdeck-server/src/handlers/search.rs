//! Case-insensitive substring search across the caller's boards.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::views;
use crate::response;

const MAX_BOARD_RESULTS: usize = 10;
const MAX_LIST_RESULTS: usize = 10;
const MAX_TASK_RESULTS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// `GET /api/search?q=...`
///
/// Scope is every board the caller can access. Boards match on name,
/// lists on title, tasks on title or description. Each bucket is capped
/// independently and truncated in creation order.
pub async fn search(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let needle = query.q.unwrap_or_default().trim().to_lowercase();
    if needle.is_empty() {
        return Err(ApiError::Validation("search query is required".to_string()));
    }

    let boards = state.store.boards_for_user(user.id).await;
    let board_ids: Vec<Uuid> = boards.iter().map(|b| b.id).collect();

    let mut board_hits: Vec<_> = boards
        .iter()
        .filter(|b| matches(&b.name, &needle))
        .cloned()
        .collect();
    board_hits.sort_by_key(|b| b.id);
    board_hits.truncate(MAX_BOARD_RESULTS);

    let mut list_hits = Vec::new();
    let mut task_hits = Vec::new();
    for board_id in &board_ids {
        for list in state.store.lists_for_board(*board_id).await {
            if matches(&list.title, &needle) {
                list_hits.push(list.clone());
            }
            for task in state.store.tasks_for_list(list.id).await {
                if matches(&task.title, &needle) || matches(&task.description, &needle) {
                    task_hits.push(task);
                }
            }
        }
    }
    list_hits.sort_by_key(|l| l.id);
    list_hits.truncate(MAX_LIST_RESULTS);
    task_hits.sort_by_key(|t| t.id);
    task_hits.truncate(MAX_TASK_RESULTS);

    let mut board_views = Vec::with_capacity(board_hits.len());
    for board in &board_hits {
        board_views.push(views::board_summary(&state.store, board).await);
    }
    let counts = (board_views.len(), list_hits.len(), task_hits.len());

    tracing::debug!(
        query = %needle,
        boards = counts.0,
        lists = counts.1,
        tasks = counts.2,
        "search completed"
    );
    Ok(response::ok(json!({
        "query": needle,
        "results": {
            "boards": board_views,
            "lists": list_hits,
            "tasks": task_hits,
        },
        "count": {
            "boards": counts.0,
            "lists": counts.1,
            "tasks": counts.2,
            "total": counts.0 + counts.1 + counts.2,
        },
    })))
}
