use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub docs: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// "connected" or "disconnected"
    pub storage: String,
    pub backend: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service name and version", body = ServiceInfo)
    ),
    tag = "health"
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "LeetCode Leaderboard API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/swagger-ui".to_string(),
    })
}

/// Reports whether the record store answers.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store();
    let storage_status = match store.health_check().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!("Storage health check failed: {:?}", e);
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: if storage_status == "connected" {
            "healthy"
        } else {
            "unhealthy"
        }
        .to_string(),
        storage: storage_status.to_string(),
        backend: store.backend_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
