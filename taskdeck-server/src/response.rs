//! The JSON response envelope shared by every endpoint.
//!
//! Shape: `{"success": bool, "message"?: string, "data"?: {...}}`.

use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// The uniform response body for success and failure alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    /// A failure envelope carrying only a message.
    #[must_use]
    pub const fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

/// 200 with data.
pub fn ok(data: serde_json::Value) -> (StatusCode, Json<Envelope>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: None,
            data: Some(data),
        }),
    )
}

/// 200 with a message and data.
pub fn ok_with(message: &str, data: serde_json::Value) -> (StatusCode, Json<Envelope>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }),
    )
}

/// 200 with only a message.
pub fn ok_message(message: &str) -> (StatusCode, Json<Envelope>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }),
    )
}

/// 201 with a message and data.
pub fn created(message: &str, data: serde_json::Value) -> (StatusCode, Json<Envelope>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }),
    )
}
