use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{UserStore, duplicate_username, username_changed};
use crate::error::{Result, StorageError};
use crate::models::{TierCounts, UserRecord};

/// Process-local [`UserStore`]. Used when no database is configured and in
/// tests; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    fn username_taken(users: &HashMap<Uuid, UserRecord>, record: &UserRecord) -> bool {
        users
            .values()
            .any(|u| u.id != record.id && u.external_username == record.external_username)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<UserRecord> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find_by_external_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.external_username == username)
            .cloned())
    }

    async fn insert(&self, record: &UserRecord) -> Result<()> {
        let mut users = self.users.write().await;

        if users.contains_key(&record.id) {
            return Err(StorageError::ConstraintViolation(format!(
                "User {} already exists",
                record.id
            )));
        }
        if Self::username_taken(&users, record) {
            return Err(duplicate_username(&record.external_username));
        }

        users.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &UserRecord) -> Result<()> {
        let mut users = self.users.write().await;

        if !users.contains_key(&record.id) {
            return Err(StorageError::NotFound);
        }
        if Self::username_taken(&users, record) {
            return Err(duplicate_username(&record.external_username));
        }

        users.insert(record.id, record.clone());
        Ok(())
    }

    async fn record_fetch(
        &self,
        id: Uuid,
        expected_username: &str,
        counts: TierCounts,
        fetched_at: DateTime<Utc>,
    ) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&id).ok_or(StorageError::NotFound)?;

        if stored.external_username != expected_username {
            return Err(username_changed(expected_username));
        }

        *stored = stored.clone().with_fetched_counts(counts, fetched_at);
        Ok(stored.clone())
    }

    async fn reset_baseline(&self, id: Uuid) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&id).ok_or(StorageError::NotFound)?;

        stored.baseline = stored.current;
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TierCounts;
    use chrono::{Duration, Utc};

    fn record(username: &str) -> UserRecord {
        UserRecord::enroll(username, username, Some(TierCounts::new(1, 2, 3)), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_get_and_delete() {
        let store = InMemoryUserStore::new();
        let user = record("alice");

        store.insert(&user).await.unwrap();
        assert_eq!(store.get(user.id).await.unwrap(), user);

        store.delete(user.id).await.unwrap();
        assert!(matches!(store.get(user.id).await, Err(StorageError::NotFound)));
        assert!(matches!(store.delete(user.id).await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_external_username_rejected() {
        let store = InMemoryUserStore::new();
        store.insert(&record("alice")).await.unwrap();

        let result = store.insert(&record("alice")).await;

        assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = InMemoryUserStore::new();

        let result = store.update(&record("ghost")).await;

        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_cannot_steal_username() {
        let alice = record("alice");
        let mut bob = record("bob");
        let store = InMemoryUserStore::with_users([alice, bob.clone()]);

        bob.external_username = "alice".to_string();

        assert!(matches!(
            store.update(&bob).await,
            Err(StorageError::ConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_ordered_by_enrollment() {
        let t0 = Utc::now();
        let mut late = record("late");
        late.created_at = t0 + Duration::seconds(10);
        let mut early = record("early");
        early.created_at = t0;
        let store = InMemoryUserStore::with_users([late, early]);

        let users = store.list().await.unwrap();

        assert_eq!(users[0].external_username, "early");
        assert_eq!(users[1].external_username, "late");
    }

    #[tokio::test]
    async fn test_find_by_external_username() {
        let store = InMemoryUserStore::with_users([record("alice")]);

        assert!(store.find_by_external_username("alice").await.unwrap().is_some());
        assert!(store.find_by_external_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_fetch_touches_only_counts() {
        let mut user = record("alice");
        user.display_name = "Alice Renamed".to_string();
        let store = InMemoryUserStore::with_users([user.clone()]);

        let stored = store
            .record_fetch(user.id, "alice", TierCounts::new(4, 5, 6), Utc::now())
            .await
            .unwrap();

        assert_eq!(stored.display_name, "Alice Renamed");
        assert_eq!(stored.baseline, TierCounts::new(1, 2, 3));
        assert_eq!(stored.current, TierCounts::new(4, 5, 6));
        assert_eq!(store.get(user.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_record_fetch_captures_deferred_baseline() {
        let user = UserRecord::enroll("bob", "bob", None, Utc::now());
        let store = InMemoryUserStore::with_users([user.clone()]);

        let stored = store
            .record_fetch(user.id, "bob", TierCounts::new(7, 8, 9), Utc::now())
            .await
            .unwrap();

        assert_eq!(stored.baseline, TierCounts::new(7, 8, 9));
        assert!(stored.has_synced());
    }

    #[tokio::test]
    async fn test_record_fetch_skips_changed_username() {
        let mut user = record("carol");
        let store = InMemoryUserStore::with_users([user.clone()]);
        user.external_username = "carol-new".to_string();
        store.update(&user).await.unwrap();

        let result = store
            .record_fetch(user.id, "carol", TierCounts::new(9, 9, 9), Utc::now())
            .await;

        assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
        assert_eq!(store.get(user.id).await.unwrap().current, TierCounts::new(1, 2, 3));

        let missing = store
            .record_fetch(Uuid::new_v4(), "carol", TierCounts::ZERO, Utc::now())
            .await;
        assert!(matches!(missing, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_reset_baseline_in_place() {
        let mut user = record("dave");
        user.current = TierCounts::new(10, 20, 30);
        let store = InMemoryUserStore::with_users([user.clone()]);

        let stored = store.reset_baseline(user.id).await.unwrap();

        assert_eq!(stored.baseline, TierCounts::new(10, 20, 30));
        assert!(matches!(
            store.reset_baseline(Uuid::new_v4()).await,
            Err(StorageError::NotFound)
        ));
    }
}
