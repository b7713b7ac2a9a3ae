use axum::{
    Json,
    extract::{Query, State},
};
use storage::dto::{common::PaginationParams, leaderboard::LeaderboardView};

use crate::error::{ApiResult, WebError};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(PaginationParams),
    responses(
        (status = 200, description = "Leaderboard sorted by score, highest first", body = LeaderboardView),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<LeaderboardView>> {
    params.validate().map_err(WebError::BadRequest)?;

    let view = services::get_leaderboard(state.store(), &state.weights, &params).await?;

    Ok(Json(view))
}
