// File Path: src/routes/auth.rs

//! Auth Routes
//!
//! Registration, JWT obtain/refresh, and the protected profile.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{auth, state::AppState};

/// Creates auth-related routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register/", post(auth::register))
        .route("/api/token/", post(auth::obtain_token))
        .route("/api/token/refresh/", post(auth::refresh_token))
        .route("/api/profile/", get(auth::profile))
}
