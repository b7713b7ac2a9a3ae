use axum::{
    Router, middleware,
    routing::{post, put},
};

use super::handlers::{
    create_user, delete_user, reset_all_baselines, reset_user_baseline, sync_all, sync_all_async,
    sync_user, update_user, verify_token,
};
use crate::middleware::auth::{AdminTokens, require_auth};
use crate::state::AppState;

pub fn routes(admin_tokens: AdminTokens) -> Router<AppState> {
    Router::new()
        .route("/verify", post(verify_token))
        .route("/users", post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .route("/users/:id/sync", post(sync_user))
        .route("/users/:id/reset-baseline", post(reset_user_baseline))
        .route("/sync", post(sync_all))
        .route("/sync/async", post(sync_all_async))
        .route("/reset-baselines", post(reset_all_baselines))
        .route_layer(middleware::from_fn_with_state(admin_tokens, require_auth))
}
