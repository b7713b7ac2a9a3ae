pub mod memory;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{TierCounts, UserRecord};

pub use memory::InMemoryUserStore;
pub use user::PgUserStore;

/// Persistence for tracked users. Every write touches exactly one record.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `StorageError::NotFound` when no record has this id
    async fn get(&self, id: Uuid) -> Result<UserRecord>;

    /// All records, oldest enrollment first
    async fn list(&self) -> Result<Vec<UserRecord>>;

    async fn find_by_external_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// `StorageError::ConstraintViolation` when the external username is taken
    async fn insert(&self, record: &UserRecord) -> Result<()>;

    /// Replaces the stored record with the same id.
    async fn update(&self, record: &UserRecord) -> Result<()>;

    /// Stores freshly fetched counts without touching the name fields.
    ///
    /// Only `current` and `last_synced_at` change, plus `baseline` when the
    /// record was never synced. The write is skipped with
    /// `ConstraintViolation` if the record no longer points at
    /// `expected_username`, and fails with `NotFound` if it is gone.
    async fn record_fetch(
        &self,
        id: Uuid,
        expected_username: &str,
        counts: TierCounts,
        fetched_at: DateTime<Utc>,
    ) -> Result<UserRecord>;

    /// Sets `baseline := current` on the stored record in one write.
    async fn reset_baseline(&self, id: Uuid) -> Result<UserRecord>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn health_check(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub(crate) fn username_changed(expected: &str) -> crate::error::StorageError {
    crate::error::StorageError::ConstraintViolation(format!(
        "LeetCode username changed from '{}' while its stats were being fetched",
        expected
    ))
}

pub(crate) fn duplicate_username(username: &str) -> crate::error::StorageError {
    crate::error::StorageError::ConstraintViolation(format!(
        "User with LeetCode username '{}' already exists",
        username
    ))
}
