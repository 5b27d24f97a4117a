//! Paginated activity feed for a board.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use taskdeck_proto::model::ActivityKind;

use crate::AppState;
use crate::access;
use crate::activity;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::response;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// `GET /api/boards/{id}/activities`
///
/// Newest first. `type` filters to one activity kind; an unknown kind is
/// a validation error rather than an empty page.
pub async fn feed(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    access::board_access(&state.store, id, user.id).await?;

    let kind = match &query.kind {
        Some(raw) => Some(
            raw.parse::<ActivityKind>()
                .map_err(|e| ApiError::Validation(e.to_string()))?,
        ),
        None => None,
    };
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let feed = activity::feed(&state.store, id, page, limit, kind).await;
    Ok(response::ok(json!({
        "activities": feed.entries,
        "pagination": {
            "page": feed.page,
            "limit": feed.limit,
            "total": feed.total,
            "pages": feed.pages,
        },
    })))
}
