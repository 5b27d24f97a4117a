//! Taskdeck server library.
//!
//! Exposes the HTTP/WebSocket application for use in tests and embedding.
//! The server keeps board/list/task state in an in-memory document store,
//! guards every route behind bearer auth and board membership, and fans
//! mutation events out to board-scoped realtime rooms.

pub mod access;
pub mod activity;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ordering;
pub mod response;
pub mod rooms;
pub mod store;
pub mod validate;
pub mod ws;

use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::ServerConfig;
use crate::rooms::RoomRegistry;
use crate::store::Store;

/// Shared state behind every handler.
pub struct AppState {
    pub store: Store,
    pub rooms: RoomRegistry,
    pub auth: TokenIssuer,
}

impl AppState {
    /// Builds state from a resolved configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        error::set_dev_mode(config.dev_mode);
        Self {
            store: Store::new(),
            rooms: RoomRegistry::new(),
            auth: TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl_hours),
        }
    }
}

/// Starts the server with default configuration. Intended for tests.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let state = Arc::new(AppState::from_config(&ServerConfig::default()));
    start_server_with_state(addr, state).await
}

/// Starts the server with a pre-built [`AppState`].
///
/// Binds, then serves on a spawned task; returns the bound address (so
/// `127.0.0.1:0` callers learn their port) and the task handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}
