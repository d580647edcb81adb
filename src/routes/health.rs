// File Path: src/routes/health.rs
//! Health Check Routes
//!
//! Provides health monitoring and service info endpoints

use axum::{routing::get, Router};

use crate::{api::state::AppState, api::system};

/// Creates health-related routes and merges them into the main router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health/", get(system::health_check))
        .route("/api/", get(system::service_info))
}
