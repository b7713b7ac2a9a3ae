//! Fetch-then-update of tracked users against a [`StatsProvider`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use storage::{
    UserStore,
    dto::sync::SyncReport,
    error::StorageError,
    models::{TierCounts, UserRecord},
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, SyncError};
use crate::rate_limit::RateLimiter;
use crate::traits::StatsProvider;

const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Users synced at the same time; outbound calls are still rate limited
    pub concurrency: usize,
    /// Minimum spacing between two provider calls
    pub min_interval: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            min_interval: Duration::from_secs(1),
        }
    }
}

/// Fetches one user's counts and persists them.
///
/// Only the counts and sync time are written; a rename or baseline reset
/// made after `user` was read survives. On failure nothing is written.
pub async fn sync_one(
    user: &UserRecord,
    provider: &dyn StatsProvider,
    store: &dyn UserStore,
    limiter: &RateLimiter,
) -> Result<UserRecord> {
    limiter.acquire().await;
    let counts = provider.fetch(&user.external_username).await?;

    let updated = store
        .record_fetch(user.id, &user.external_username, counts, Utc::now())
        .await?;

    Ok(updated)
}

/// Syncs every user exactly once and reports the outcome per user.
///
/// At most `options.concurrency` users are in flight. A failing user never
/// stops the rest of the batch; its message lands in `errors` at the
/// position the user had in `users`.
pub async fn sync_all(
    users: Vec<UserRecord>,
    provider: Arc<dyn StatsProvider>,
    store: Arc<dyn UserStore>,
    limiter: Arc<RateLimiter>,
    options: &SyncOptions,
) -> SyncReport {
    let total = users.len();
    let labels: Vec<String> = users.iter().map(describe).collect();
    let queue = Arc::new(Mutex::new(
        users.into_iter().enumerate().collect::<VecDeque<_>>(),
    ));

    info!(
        "Syncing {} users from {} (concurrency {}, spacing {:?})",
        total,
        provider.name(),
        options.concurrency.max(1),
        limiter.min_interval()
    );

    let workers = options.concurrency.clamp(1, total.max(1));
    let mut tasks = JoinSet::new();
    for _ in 0..workers {
        let queue = queue.clone();
        let provider = provider.clone();
        let store = store.clone();
        let limiter = limiter.clone();

        tasks.spawn(async move {
            let mut done = Vec::new();
            loop {
                let next = queue.lock().await.pop_front();
                let Some((idx, user)) = next else {
                    break;
                };

                let outcome = sync_one(&user, provider.as_ref(), store.as_ref(), &limiter).await;
                done.push((idx, log_outcome(&user, outcome)));
            }
            done
        });
    }

    let mut outcomes: Vec<Option<std::result::Result<(), String>>> = vec![None; total];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(done) => {
                for (idx, outcome) in done {
                    outcomes[idx] = Some(outcome);
                }
            }
            Err(e) => warn!("Sync worker stopped early: {}", e),
        }
    }

    let report = SyncReport::from_outcomes(outcomes.into_iter().enumerate().map(|(idx, o)| {
        o.unwrap_or_else(|| Err(format!("Failed to sync {}: sync task aborted", labels[idx])))
    }));

    info!(
        "Sync finished: {} succeeded, {} failed",
        report.updated_count, report.failed_count
    );
    report
}

fn describe(user: &UserRecord) -> String {
    format!("{} ({})", user.display_name, user.external_username)
}

fn log_outcome(user: &UserRecord, outcome: Result<UserRecord>) -> std::result::Result<(), String> {
    match outcome {
        Ok(updated) => {
            info!(
                "  ✓ {}: easy {} / medium {} / hard {}",
                describe(&updated),
                updated.current.easy,
                updated.current.medium,
                updated.current.hard
            );
            Ok(())
        }
        Err(e) => {
            warn!("  ✗ {}: {}", describe(user), e);
            Err(format!("Failed to sync {}: {}", describe(user), e))
        }
    }
}

/// Held while a full sync runs; at most one exists per [`SyncContext`].
pub struct SyncPermit {
    _guard: OwnedMutexGuard<()>,
}

/// Shared handles for running syncs: one store, one provider and one rate
/// limiter for every outbound call the process makes.
#[derive(Clone)]
pub struct SyncContext {
    store: Arc<dyn UserStore>,
    provider: Arc<dyn StatsProvider>,
    limiter: Arc<RateLimiter>,
    full_sync: Arc<Mutex<()>>,
    options: SyncOptions,
}

impl SyncContext {
    pub fn new(
        store: Arc<dyn UserStore>,
        provider: Arc<dyn StatsProvider>,
        options: SyncOptions,
    ) -> Self {
        Self {
            store,
            provider,
            limiter: Arc::new(RateLimiter::new(options.min_interval)),
            full_sync: Arc::new(Mutex::new(())),
            options,
        }
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    pub fn provider(&self) -> &dyn StatsProvider {
        self.provider.as_ref()
    }

    /// Rate-limited provider lookup that stores nothing.
    pub async fn fetch(&self, external_username: &str) -> Result<TierCounts> {
        self.limiter.acquire().await;
        self.provider.fetch(external_username).await
    }

    pub async fn sync_one(&self, user: &UserRecord) -> Result<UserRecord> {
        sync_one(user, self.provider.as_ref(), self.store.as_ref(), &self.limiter).await
    }

    pub async fn sync_user(&self, id: Uuid) -> Result<UserRecord> {
        let user = self.store.get(id).await?;
        self.sync_one(&user).await
    }

    pub async fn sync_all(&self, users: Vec<UserRecord>) -> SyncReport {
        sync_all(
            users,
            self.provider.clone(),
            self.store.clone(),
            self.limiter.clone(),
            &self.options,
        )
        .await
    }

    /// Claims the single full-sync slot, or `SyncInProgress` if taken.
    pub fn try_start_full_sync(&self) -> Result<SyncPermit> {
        let guard = self
            .full_sync
            .clone()
            .try_lock_owned()
            .map_err(|_| SyncError::SyncInProgress)?;

        Ok(SyncPermit { _guard: guard })
    }

    /// Syncs every stored user; fails with `SyncInProgress` instead of
    /// overlapping another full sync.
    pub async fn sync_store(&self) -> Result<SyncReport> {
        let permit = self.try_start_full_sync()?;
        self.sync_store_with(permit).await
    }

    /// Full sync under a permit taken earlier with
    /// [`try_start_full_sync`](Self::try_start_full_sync).
    pub async fn sync_store_with(&self, permit: SyncPermit) -> Result<SyncReport> {
        let users = self.store.list().await?;
        let report = self.sync_all(users).await;
        drop(permit);
        Ok(report)
    }

    /// Enrolls a user, taking the first fetch as baseline.
    ///
    /// An unknown LeetCode account is rejected. When the provider is down or
    /// answers garbage the user is still enrolled with a deferred baseline,
    /// captured by the first successful sync.
    pub async fn enroll(&self, display_name: &str, external_username: &str) -> Result<UserRecord> {
        let display_name = display_name.trim();
        let external_username = external_username.trim();

        if display_name.is_empty() || external_username.is_empty() {
            return Err(SyncError::Storage(StorageError::InvalidInput(
                "display name and LeetCode username are required".to_string(),
            )));
        }
        if display_name.chars().count() > MAX_NAME_LEN
            || external_username.chars().count() > MAX_NAME_LEN
        {
            return Err(SyncError::Storage(StorageError::InvalidInput(format!(
                "names are limited to {} characters",
                MAX_NAME_LEN
            ))));
        }

        if self
            .store
            .find_by_external_username(external_username)
            .await?
            .is_some()
        {
            return Err(SyncError::Storage(StorageError::ConstraintViolation(
                format!(
                    "User with LeetCode username '{}' already exists",
                    external_username
                ),
            )));
        }

        let initial = match self.fetch(external_username).await {
            Ok(counts) => Some(counts),
            Err(e) if e.is_transient() => {
                warn!(
                    "Enrolling '{}' without baseline, first sync will capture it: {}",
                    external_username, e
                );
                None
            }
            Err(e) => return Err(e),
        };

        let user = UserRecord::enroll(display_name, external_username, initial, Utc::now());
        self.store.insert(&user).await?;

        info!("Enrolled {} ({})", describe(&user), user.id);
        Ok(user)
    }
}
