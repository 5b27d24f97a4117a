//! Ordering engine: position assignment and drag-and-drop move resolution.
//!
//! Positions are a sparse, absolute ranking, never a dense index. A new
//! sibling gets `max(existing) + 1` (or 0 in an empty set); a move writes
//! the caller-supplied position directly without renumbering siblings, so
//! duplicates and gaps are expected after a few moves. Display order is
//! always a stable sort ascending by position; ties break by creation
//! order, which the UUID v7 id encodes.

use uuid::Uuid;

use taskdeck_proto::model::{List, Task};

use crate::store::Store;

/// Ordered items: lists within a board, tasks within a list.
pub trait Positioned {
    fn position(&self) -> i64;
    fn id(&self) -> Uuid;
}

impl Positioned for List {
    fn position(&self) -> i64 {
        self.position
    }
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Positioned for Task {
    fn position(&self) -> i64 {
        self.position
    }
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Position for a newly created sibling: one past the current maximum,
/// zero for an empty set. No gap filling. Saturates at `i64::MAX`, since
/// callers may place a sibling there directly.
pub fn next_position<T: Positioned>(siblings: &[T]) -> i64 {
    siblings
        .iter()
        .map(Positioned::position)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Sorts siblings into display order: ascending position, ties broken by
/// id (UUID v7, so creation order).
pub fn sort_for_display<T: Positioned>(siblings: &mut [T]) {
    siblings.sort_by_key(|item| (item.position(), item.id()));
}

/// Resolves a task move onto the store.
///
/// Cross-list moves pull the task's reference from the source list, push
/// it onto the destination, and rewrite the task's owning list; same-list
/// moves only write the position. The container updates and the task
/// update are each per-document atomic but are independent operations,
/// so a crash between them can orphan a reference. Display order is
/// derived from task positions, not the reference arrays, so an orphaned
/// reference never corrupts what clients see.
///
/// Returns the updated task, or `None` if the task vanished mid-move
/// (concurrent delete; last write wins).
pub async fn apply_move(
    store: &Store,
    task_id: Uuid,
    old_list_id: Uuid,
    new_list_id: Uuid,
    position: i64,
) -> Option<Task> {
    if new_list_id != old_list_id {
        store
            .update_list(old_list_id, |l| l.tasks.retain(|t| *t != task_id))
            .await;
        store
            .update_list(new_list_id, |l| l.tasks.push(task_id))
            .await;
    }
    store
        .update_task(task_id, |t| {
            t.list = new_list_id;
            t.position = position;
            t.updated_at = chrono::Utc::now();
        })
        .await
}
