//! HTTP surface: routing and the per-entity handler modules.
//!
//! Control flow for every mutating route: bearer auth → board access
//! check → store mutation (through the ordering engine where positions
//! are involved) → activity append → room fan-out → envelope response.

pub mod activities;
pub mod auth;
pub mod boards;
pub mod lists;
pub mod search;
pub mod tasks;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};

use crate::AppState;
use crate::ws;

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/boards", post(boards::create).get(boards::index))
        .route(
            "/api/boards/{id}",
            get(boards::show).put(boards::update).delete(boards::destroy),
        )
        .route("/api/boards/{id}/members", post(boards::add_member))
        .route(
            "/api/boards/{id}/members/{member_id}",
            delete(boards::remove_member),
        )
        .route("/api/boards/{id}/activities", get(activities::feed))
        .route(
            "/api/boards/{board_id}/lists",
            post(lists::create).get(lists::index),
        )
        .route(
            "/api/boards/list/{id}",
            put(lists::update).delete(lists::destroy),
        )
        .route(
            "/api/lists/{list_id}/tasks",
            post(tasks::create).get(tasks::index),
        )
        .route(
            "/api/lists/task/{id}",
            get(tasks::show).put(tasks::update).delete(tasks::destroy),
        )
        .route("/api/lists/task/{id}/move", patch(tasks::move_task))
        .route("/api/lists/task/{id}/assign", post(tasks::assign))
        .route(
            "/api/lists/task/{id}/assign/{user_id}",
            delete(tasks::unassign),
        )
        .route("/api/search", get(search::search))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}
