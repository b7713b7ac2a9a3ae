use axum::{Router, routing::get};

use super::handlers::{health_check, service_info};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}
