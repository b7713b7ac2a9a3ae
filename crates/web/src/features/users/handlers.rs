use axum::{
    Json,
    extract::{Path, State},
};
use storage::dto::user::UserResponse;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "Tracked user id")
    ),
    responses(
        (status = 200, description = "User with score breakdown", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = services::get_user(state.store(), &state.weights, id).await?;

    Ok(Json(user))
}
