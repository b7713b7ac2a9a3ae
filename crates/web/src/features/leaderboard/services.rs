use storage::{
    UserStore,
    dto::{common::PaginationParams, leaderboard::LeaderboardView},
    error::Result,
    models::TierWeights,
    services::leaderboard::project,
};

/// Ranked page of the leaderboard. Ranks and totals are global, not per page.
pub async fn get_leaderboard(
    store: &dyn UserStore,
    weights: &TierWeights,
    params: &PaginationParams,
) -> Result<LeaderboardView> {
    let users = store.list().await?;
    let view = project(&users, weights)?;
    Ok(view.page(params.offset(), params.limit()))
}
