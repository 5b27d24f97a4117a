//! Error taxonomy for the Taskdeck API.
//!
//! Every component-level failure is classified into one [`ApiError`]
//! variant and surfaced to the caller as the standard JSON envelope.
//! The only exceptions are the activity recorder and the realtime
//! broadcaster, whose failures are logged and never propagate.

use std::sync::OnceLock;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::response::Envelope;

/// Whether error responses include internal detail (development mode).
static DEV_MODE: OnceLock<bool> = OnceLock::new();

/// Enables or disables development-mode error detail. First call wins.
pub fn set_dev_mode(enabled: bool) {
    let _ = DEV_MODE.set(enabled);
}

fn dev_mode() -> bool {
    DEV_MODE.get().copied().unwrap_or(false)
}

/// The primary error type for all request-handling failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input. 400.
    #[error("{0}")]
    Validation(String),

    /// No bearer credential was supplied. 401.
    #[error("no token provided, please login to access this resource")]
    MissingToken,

    /// The bearer credential is malformed or its signature is invalid. 401.
    #[error("invalid token, please login again")]
    InvalidToken,

    /// The bearer credential has expired. 401.
    #[error("token expired, please login again")]
    TokenExpired,

    /// Login failed; deliberately does not reveal which credential was wrong. 401.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The caller lacks membership or ownership of the target board. 403.
    #[error("{0}")]
    Denied(String),

    /// The entity or its board does not exist. 404.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Duplicate username/email, duplicate member, already-assigned user. 400.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure. 500; detail only exposed in dev mode.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error surfaces as.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::MissingToken
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Denied(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            if let Self::Internal(detail) = &self {
                tracing::error!(detail = %detail, "internal error");
                if dev_mode() {
                    let body = Envelope::failure(format!("internal server error: {detail}"));
                    return (status, Json(body)).into_response();
                }
            }
        }
        (status, Json(Envelope::failure(self.to_string()))).into_response()
    }
}
