//! Signup, login, and identity resolution.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use taskdeck_proto::model::{
    MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, PublicUser, User,
};

use crate::auth::{self as credentials, AuthUser};
use crate::error::ApiError;
use crate::response;
use crate::validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate::length(
        "username",
        &req.username,
        MIN_USERNAME_LENGTH,
        MAX_USERNAME_LENGTH,
    )?;
    validate::email(&req.email)?;
    validate::min_length("password", &req.password, MIN_PASSWORD_LENGTH)?;

    if state.store.user_by_email(&req.email).await.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }
    if state.store.user_by_username(&req.username).await.is_some() {
        return Err(ApiError::Conflict("username already taken".to_string()));
    }

    let user = User {
        id: Uuid::now_v7(),
        username: req.username,
        email: req.email,
        password_hash: credentials::hash_password(&req.password)?,
        created_at: Utc::now(),
    };
    state.store.insert_user(user.clone()).await;
    let token = state.auth.issue(user.id)?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(response::created(
        "user registered successfully",
        json!({ "user": PublicUser::from(&user), "token": token }),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // One failure path for unknown email and wrong password alike.
    let user = state
        .store
        .user_by_email(&req.email)
        .await
        .ok_or(ApiError::InvalidCredentials)?;
    if !credentials::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.auth.issue(user.id)?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(response::ok_with(
        "login successful",
        json!({ "user": PublicUser::from(&user), "token": token }),
    ))
}

/// `GET /api/auth/me`
pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    response::ok(json!({ "user": PublicUser::from(&user) }))
}
