use std::time::Duration;

use storage::{
    UserStore,
    dto::{sync::SyncReport, user::UpdateUserRequest},
    error::{Result, StorageError},
    models::UserRecord,
    services::baseline,
};
use tokio::task::JoinHandle;
use tracker::{SyncContext, SyncError};
use uuid::Uuid;

/// Edit display name and/or LeetCode username of a tracked user
pub async fn update_user(
    store: &dyn UserStore,
    id: Uuid,
    request: &UpdateUserRequest,
) -> Result<UserRecord> {
    let existing = store.get(id).await?;

    if let Some(ref username) = request.external_username
        && let Some(other) = store.find_by_external_username(username).await?
        && other.id != id
    {
        return Err(StorageError::ConstraintViolation(format!(
            "User with LeetCode username '{}' already exists",
            username
        )));
    }

    let updated = request.apply(existing);
    store.update(&updated).await?;
    Ok(updated)
}

pub async fn delete_user(store: &dyn UserStore, id: Uuid) -> Result<()> {
    store.delete(id).await
}

pub async fn reset_user_baseline(store: &dyn UserStore, id: Uuid) -> Result<UserRecord> {
    baseline::reset_user_baseline(store, id).await
}

pub async fn reset_all_baselines(store: &dyn UserStore) -> Result<SyncReport> {
    baseline::reset_store_baselines(store).await
}

/// Starts a full sync in the background and returns immediately.
///
/// Fails with `SyncInProgress` while another full sync is running.
pub fn spawn_store_sync(ctx: SyncContext) -> tracker::Result<JoinHandle<()>> {
    let permit = ctx.try_start_full_sync()?;

    Ok(tokio::spawn(async move {
        match ctx.sync_store_with(permit).await {
            Ok(report) => tracing::info!(
                "Background sync done: {} updated, {} failed",
                report.updated_count,
                report.failed_count
            ),
            Err(e) => tracing::error!("Background sync could not list users: {}", e),
        }
    }))
}

/// Syncs every `period`, starting one period after the call. A tick that
/// finds another full sync running is skipped.
pub fn spawn_periodic_sync(ctx: SyncContext, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            tracing::info!("Starting scheduled sync");
            match ctx.sync_store().await {
                Ok(_) => {}
                Err(SyncError::SyncInProgress) => {
                    tracing::info!("Skipping scheduled sync, another sync is running")
                }
                Err(e) => tracing::error!("Scheduled sync could not list users: {}", e),
            }
        }
    })
}
