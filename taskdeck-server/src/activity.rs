//! Activity recorder: best-effort audit trail and the paginated feed.
//!
//! Exactly one entry is appended per successful mutation. The append is
//! fire-and-forget at this seam: it returns nothing and logs internally,
//! so a fallible backing store can never fail the parent mutation.

use uuid::Uuid;

use taskdeck_proto::model::{Activity, ActivityKind};

use crate::store::Store;

/// Appends one audit entry. Never fails the caller.
pub async fn record(
    store: &Store,
    kind: ActivityKind,
    user: Uuid,
    board: Uuid,
    task: Option<Uuid>,
    details: String,
) {
    let activity = Activity::new(kind, user, board, task, details);
    tracing::debug!(
        board_id = %board,
        kind = %activity.kind,
        "recording activity"
    );
    store.insert_activity(activity).await;
}

/// One page of a board's activity feed, newest first.
pub struct ActivityPage {
    pub entries: Vec<Activity>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

/// Reads a page of the board's feed, optionally filtered by kind.
///
/// Page numbering is 1-based; out-of-range pages return an empty entry
/// list with the real total.
pub async fn feed(
    store: &Store,
    board: Uuid,
    page: usize,
    limit: usize,
    kind: Option<ActivityKind>,
) -> ActivityPage {
    let page = page.max(1);
    let limit = limit.max(1);

    let mut entries = store.activities_for_board(board).await;
    if let Some(kind) = kind {
        entries.retain(|a| a.kind == kind);
    }
    // Newest first; ids are v7 so they order identically to created_at.
    entries.sort_by(|a, b| b.id.cmp(&a.id));

    let total = entries.len();
    let pages = total.div_ceil(limit);
    let entries = entries
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    ActivityPage {
        entries,
        page,
        limit,
        total,
        pages,
    }
}
