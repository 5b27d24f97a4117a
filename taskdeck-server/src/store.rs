//! In-memory document store for Taskdeck entities.
//!
//! One `RwLock<HashMap>` per collection; every update method takes the
//! collection write lock, applies a closure to the single target document,
//! and returns the updated copy. That gives per-document atomic
//! read-modify-write, which is all the rest of the server assumes: a
//! cross-container task move is issued as independent atomic updates, not
//! a transaction.
//!
//! Contents are ephemeral and lost on server restart, same as the realtime
//! room registry.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use taskdeck_proto::model::{Activity, Board, List, Task, User};

/// The store. Cheap scans are fine at this scale; lookups that a real
/// document database would index (email, username, foreign keys) are
/// linear over the collection.
#[derive(Default)]
pub struct Store {
    users: RwLock<HashMap<Uuid, User>>,
    boards: RwLock<HashMap<Uuid, Board>>,
    lists: RwLock<HashMap<Uuid, List>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
    activities: RwLock<HashMap<Uuid, Activity>>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- users --------------------------------------------------------------

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn user(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|u| u.email == email).cloned()
    }

    pub async fn user_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|u| u.username == username).cloned()
    }

    // -- boards -------------------------------------------------------------

    pub async fn insert_board(&self, board: Board) {
        self.boards.write().await.insert(board.id, board);
    }

    pub async fn board(&self, id: Uuid) -> Option<Board> {
        self.boards.read().await.get(&id).cloned()
    }

    /// Atomically mutates one board, returning the updated copy.
    pub async fn update_board(
        &self,
        id: Uuid,
        mutate: impl FnOnce(&mut Board),
    ) -> Option<Board> {
        let mut boards = self.boards.write().await;
        let board = boards.get_mut(&id)?;
        mutate(board);
        Some(board.clone())
    }

    pub async fn remove_board(&self, id: Uuid) -> Option<Board> {
        self.boards.write().await.remove(&id)
    }

    /// Boards the user owns or is a member of.
    pub async fn boards_for_user(&self, user: Uuid) -> Vec<Board> {
        let boards = self.boards.read().await;
        boards
            .values()
            .filter(|b| b.is_accessible_by(user))
            .cloned()
            .collect()
    }

    // -- lists --------------------------------------------------------------

    pub async fn insert_list(&self, list: List) {
        self.lists.write().await.insert(list.id, list);
    }

    pub async fn list(&self, id: Uuid) -> Option<List> {
        self.lists.read().await.get(&id).cloned()
    }

    /// Atomically mutates one list, returning the updated copy.
    pub async fn update_list(&self, id: Uuid, mutate: impl FnOnce(&mut List)) -> Option<List> {
        let mut lists = self.lists.write().await;
        let list = lists.get_mut(&id)?;
        mutate(list);
        Some(list.clone())
    }

    pub async fn remove_list(&self, id: Uuid) -> Option<List> {
        self.lists.write().await.remove(&id)
    }

    pub async fn lists_for_board(&self, board: Uuid) -> Vec<List> {
        let lists = self.lists.read().await;
        lists.values().filter(|l| l.board == board).cloned().collect()
    }

    /// Removes every list of a board, returning the removed ids.
    pub async fn remove_lists_for_board(&self, board: Uuid) -> Vec<Uuid> {
        let mut lists = self.lists.write().await;
        let ids: Vec<Uuid> = lists
            .values()
            .filter(|l| l.board == board)
            .map(|l| l.id)
            .collect();
        for id in &ids {
            lists.remove(id);
        }
        ids
    }

    // -- tasks --------------------------------------------------------------

    pub async fn insert_task(&self, task: Task) {
        self.tasks.write().await.insert(task.id, task);
    }

    pub async fn task(&self, id: Uuid) -> Option<Task> {
        self.tasks.read().await.get(&id).cloned()
    }

    /// Atomically mutates one task, returning the updated copy.
    pub async fn update_task(&self, id: Uuid, mutate: impl FnOnce(&mut Task)) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id)?;
        mutate(task);
        Some(task.clone())
    }

    pub async fn remove_task(&self, id: Uuid) -> Option<Task> {
        self.tasks.write().await.remove(&id)
    }

    pub async fn tasks_for_list(&self, list: Uuid) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        tasks.values().filter(|t| t.list == list).cloned().collect()
    }

    /// Removes every task belonging to any of the given lists.
    pub async fn remove_tasks_for_lists(&self, list_ids: &[Uuid]) -> usize {
        let mut tasks = self.tasks.write().await;
        let ids: Vec<Uuid> = tasks
            .values()
            .filter(|t| list_ids.contains(&t.list))
            .map(|t| t.id)
            .collect();
        for id in &ids {
            tasks.remove(id);
        }
        ids.len()
    }

    // -- activities ---------------------------------------------------------

    pub async fn insert_activity(&self, activity: Activity) {
        self.activities.write().await.insert(activity.id, activity);
    }

    pub async fn activities_for_board(&self, board: Uuid) -> Vec<Activity> {
        let activities = self.activities.read().await;
        activities
            .values()
            .filter(|a| a.board == board)
            .cloned()
            .collect()
    }

    /// Removes every activity entry referencing a board.
    pub async fn remove_activities_for_board(&self, board: Uuid) -> usize {
        let mut activities = self.activities.write().await;
        let ids: Vec<Uuid> = activities
            .values()
            .filter(|a| a.board == board)
            .map(|a| a.id)
            .collect();
        for id in &ids {
            activities.remove(id);
        }
        ids.len()
    }
}
