use storage::{
    UserStore, dto::user::UserResponse, error::Result, models::TierWeights,
};
use uuid::Uuid;

pub async fn get_user(
    store: &dyn UserStore,
    weights: &TierWeights,
    id: Uuid,
) -> Result<UserResponse> {
    let user = store.get(id).await?;
    UserResponse::build(user, weights)
}
