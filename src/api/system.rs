// File Path: src/api/system.rs
//! Service status handlers.

use axum::Json;

use crate::models::{HealthStatus, ServiceInfo};

/// Liveness probe.
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
    })
}

/// Service name and version.
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
