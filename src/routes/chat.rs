// File Path: src/routes/chat.rs

//! Chat Routes
//!
//! Keyword lookup over the health knowledge base.

use axum::{routing::post, Router};

use crate::api::{chat, state::AppState};

/// Creates chat-related routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/chat/", post(chat::chat))
}
