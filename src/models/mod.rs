// File Path: src/models/mod.rs

//! # Models
//!
//! HTTP-facing error type and the request/response bodies exchanged with clients.

// =========================================================================================
// SECTION 1: IMPORTS
// =========================================================================================

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::services::{token_service::TokenError, user_store::UserStoreError};

// =========================================================================================
// SECTION 2: API ERROR HANDLING
// =========================================================================================

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::InternalError(detail) => {
                error!(%detail, "request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Malformed bodies, a missing JSON content type and schema mismatches all become 400s.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<UserStoreError> for ApiError {
    fn from(inner: UserStoreError) -> Self {
        match inner {
            UserStoreError::InvalidInput(_) | UserStoreError::UsernameTaken(_) => {
                ApiError::BadRequest(inner.to_string())
            }
            UserStoreError::InvalidCredentials => ApiError::Unauthorized(inner.to_string()),
            UserStoreError::Hashing(_) => ApiError::InternalError(inner.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(inner: TokenError) -> Self {
        match inner {
            TokenError::Encoding(_) => ApiError::InternalError(inner.to_string()),
            TokenError::Invalid(_) | TokenError::WrongKind { .. } => {
                ApiError::Unauthorized(inner.to_string())
            }
        }
    }
}

// =========================================================================================
// SECTION 3: SERVICE MODELS
// =========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
}

// =========================================================================================
// SECTION 4: CHAT MODELS
// =========================================================================================

pub const DEFAULT_LANG: &str = "en";

/// Incoming chat message. Both fields may be absent or `null` on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

impl ChatRequest {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }
}

/// The responder's answer, returned to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The normalized (trimmed, lowercased) user input.
    pub user: String,
    pub bot: String,
    /// Echo of the requested language code, unvalidated.
    pub lang: String,
}

// =========================================================================================
// SECTION 5: AUTH MODELS
// =========================================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub city: String,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub city: String,
    pub date_joined: DateTime<Utc>,
    pub message: String,
}
