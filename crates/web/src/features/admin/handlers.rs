use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::{
    common::MessageResponse,
    sync::SyncReport,
    user::{CreateUserRequest, UpdateUserRequest, UserResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/verify",
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Token accepted", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn verify_token() -> Json<MessageResponse> {
    Json(MessageResponse::ok("Admin token is valid"))
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "User enrolled; baseline taken from the first fetch", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "LeetCode account does not exist"),
        (status = 409, description = "LeetCode username already tracked")
    ),
    tag = "admin"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    let user = state
        .sync
        .enroll(&req.display_name, &req.external_username)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::build(user, &state.weights)?),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "Tracked user id")
    ),
    request_body = UpdateUserRequest,
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "LeetCode username already tracked")
    ),
    tag = "admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let user = services::update_user(state.store(), id, &req).await?;

    Ok(Json(UserResponse::build(user, &state.weights)?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "Tracked user id")
    ),
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "User removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    services::delete_user(state.store(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/sync",
    params(
        ("id" = Uuid, Path, description = "Tracked user id")
    ),
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Counts refreshed", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User or LeetCode account not found"),
        (status = 502, description = "LeetCode unavailable or answered garbage")
    ),
    tag = "admin"
)]
pub async fn sync_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.sync.sync_user(id).await?;

    Ok(Json(UserResponse::build(user, &state.weights)?))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/reset-baseline",
    params(
        ("id" = Uuid, Path, description = "Tracked user id")
    ),
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Baseline set to current counts", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn reset_user_baseline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = services::reset_user_baseline(state.store(), id).await?;

    Ok(Json(UserResponse::build(user, &state.weights)?))
}

#[utoipa::path(
    post,
    path = "/api/admin/sync",
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Every user attempted once; per-user failures listed", body = SyncReport),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A full sync is already running")
    ),
    tag = "admin"
)]
pub async fn sync_all(State(state): State<AppState>) -> ApiResult<Json<SyncReport>> {
    let report = state.sync.sync_store().await?;

    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/api/admin/sync/async",
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 202, description = "Sync started in the background", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A full sync is already running")
    ),
    tag = "admin"
)]
pub async fn sync_all_async(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    services::spawn_store_sync(state.sync.clone())?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::ok("Sync started in the background")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/reset-baselines",
    security(
        ("admin_token" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Every baseline reset; per-user failures listed", body = SyncReport),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn reset_all_baselines(State(state): State<AppState>) -> ApiResult<Json<SyncReport>> {
    let report = services::reset_all_baselines(state.store()).await?;

    Ok(Json(report))
}
