// File Path: src/api/chat.rs
//! Chat API Handler
//! Answers health questions from the shared knowledge store.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::{
    api::state::AppState,
    models::{ApiResult, ChatReply, ChatRequest},
};

/// Looks up the condition named in the message and replies in the requested language.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatReply>> {
    let Json(request) = body?;
    let reply = state
        .responder
        .respond(request.message(), request.lang(), &state.knowledge);

    debug!(lang = %reply.lang, input = %reply.user, "Chat reply rendered");
    Ok(Json(reply))
}
