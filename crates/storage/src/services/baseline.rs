use uuid::Uuid;

use crate::dto::sync::SyncReport;
use crate::error::Result;
use crate::models::UserRecord;
use crate::repository::UserStore;

/// Restarts tracking from the user's current counts; score becomes 0.
pub fn reset_baseline(mut user: UserRecord) -> UserRecord {
    user.baseline = user.current;
    user
}

pub fn reset_all_baselines(users: Vec<UserRecord>) -> Vec<UserRecord> {
    users.into_iter().map(reset_baseline).collect()
}

/// Resets and persists one user's baseline. The store copies current into
/// baseline itself, so counts written by a concurrent sync are kept.
pub async fn reset_user_baseline(store: &dyn UserStore, id: Uuid) -> Result<UserRecord> {
    let user = store.reset_baseline(id).await?;

    tracing::info!("Baseline reset for {} ({})", user.display_name, user.id);
    Ok(user)
}

/// Resets every stored baseline. Each record is written on its own; a
/// failed write is reported and the remaining users are still reset.
pub async fn reset_store_baselines(store: &dyn UserStore) -> Result<SyncReport> {
    let users = store.list().await?;
    let mut outcomes = Vec::with_capacity(users.len());

    for user in users {
        let outcome = store.reset_baseline(user.id).await.map(|_| ()).map_err(|e| {
            tracing::warn!("Baseline reset failed for {}: {}", user.id, e);
            format!(
                "Failed to reset baseline for {} ({}): {}",
                user.display_name, user.external_username, e
            )
        });
        outcomes.push(outcome);
    }

    let report = SyncReport::from_outcomes(outcomes);
    tracing::info!(
        "Baseline reset: {} succeeded, {} failed",
        report.updated_count,
        report.failed_count
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::models::{TierCounts, TierWeights};
    use crate::repository::InMemoryUserStore;
    use async_trait::async_trait;
    use chrono::Utc;

    #[test]
    fn test_reset_zeroes_score() {
        let mut user = UserRecord::enroll("dana", "dana", Some(TierCounts::new(1, 2, 3)), Utc::now());
        user.current = TierCounts::new(10, 20, 30);
        assert!(user.score(&TierWeights::default()).unwrap() > 0);

        let reset = reset_baseline(user);

        assert_eq!(reset.baseline, TierCounts::new(10, 20, 30));
        assert_eq!(reset.score(&TierWeights::default()).unwrap(), 0);
    }

    #[test]
    fn test_reset_when_current_below_baseline() {
        let mut user = UserRecord::enroll("eve", "eve", Some(TierCounts::new(50, 50, 50)), Utc::now());
        user.current = TierCounts::new(40, 60, 50);

        let reset = reset_baseline(user);

        assert_eq!(reset.baseline, reset.current);
        assert_eq!(reset.score(&TierWeights::default()).unwrap(), 0);
    }

    #[test]
    fn test_reset_all_touches_only_baselines() {
        let users: Vec<_> = (0..3)
            .map(|i| {
                let mut u = UserRecord::enroll(format!("u{i}"), format!("u{i}"), Some(TierCounts::ZERO), Utc::now());
                u.current = TierCounts::new(i, i * 2, i * 3);
                u
            })
            .collect();
        let before = users.clone();

        let reset = reset_all_baselines(users);

        for (old, new) in before.iter().zip(&reset) {
            assert_eq!(new.id, old.id);
            assert_eq!(new.current, old.current);
            assert_eq!(new.baseline, old.current);
            assert_eq!(new.last_synced_at, old.last_synced_at);
        }
    }

    #[tokio::test]
    async fn test_reset_user_baseline_persists() {
        let mut user = UserRecord::enroll("finn", "finn", Some(TierCounts::ZERO), Utc::now());
        user.current = TierCounts::new(3, 3, 3);
        let store = InMemoryUserStore::with_users([user.clone()]);

        let reset = reset_user_baseline(&store, user.id).await.unwrap();

        assert_eq!(reset.baseline, TierCounts::new(3, 3, 3));
        assert_eq!(store.get(user.id).await.unwrap().baseline, TierCounts::new(3, 3, 3));
    }

    #[tokio::test]
    async fn test_reset_unknown_user() {
        let store = InMemoryUserStore::new();

        let result = reset_user_baseline(&store, Uuid::new_v4()).await;

        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    /// Delegates to an in-memory store but refuses writes for one id.
    struct FailingWrites {
        inner: InMemoryUserStore,
        broken: Uuid,
    }

    #[async_trait]
    impl UserStore for FailingWrites {
        async fn get(&self, id: Uuid) -> Result<UserRecord> {
            self.inner.get(id).await
        }
        async fn list(&self) -> Result<Vec<UserRecord>> {
            self.inner.list().await
        }
        async fn find_by_external_username(&self, username: &str) -> Result<Option<UserRecord>> {
            self.inner.find_by_external_username(username).await
        }
        async fn insert(&self, record: &UserRecord) -> Result<()> {
            self.inner.insert(record).await
        }
        async fn update(&self, record: &UserRecord) -> Result<()> {
            self.inner.update(record).await
        }
        async fn record_fetch(
            &self,
            id: Uuid,
            expected_username: &str,
            counts: TierCounts,
            fetched_at: chrono::DateTime<Utc>,
        ) -> Result<UserRecord> {
            self.inner
                .record_fetch(id, expected_username, counts, fetched_at)
                .await
        }
        async fn reset_baseline(&self, id: Uuid) -> Result<UserRecord> {
            if id == self.broken {
                return Err(StorageError::ConstraintViolation("disk full".to_string()));
            }
            self.inner.reset_baseline(id).await
        }
        async fn delete(&self, id: Uuid) -> Result<()> {
            self.inner.delete(id).await
        }
        async fn health_check(&self) -> Result<()> {
            Ok(())
        }
        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_reset_store_reports_per_user_failures() {
        let t0 = Utc::now();
        let users: Vec<_> = (0..3)
            .map(|i| {
                let mut u = UserRecord::enroll(
                    format!("user{i}"),
                    format!("user{i}"),
                    Some(TierCounts::ZERO),
                    t0 + chrono::Duration::seconds(i64::from(i)),
                );
                u.current = TierCounts::new(5, 5, 5);
                u
            })
            .collect();
        let broken = users[1].id;
        let store = FailingWrites {
            inner: InMemoryUserStore::with_users(users.clone()),
            broken,
        };

        let report = reset_store_baselines(&store).await.unwrap();

        assert!(!report.success);
        assert_eq!(report.updated_count, 2);
        assert_eq!(report.failed_count, 1);
        assert!(report.errors[0].contains("user1"));

        assert_eq!(store.get(users[0].id).await.unwrap().baseline, TierCounts::new(5, 5, 5));
        assert_eq!(store.get(broken).await.unwrap().baseline, TierCounts::ZERO);
        assert_eq!(store.get(users[2].id).await.unwrap().baseline, TierCounts::new(5, 5, 5));
    }
}
