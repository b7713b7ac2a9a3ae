use storage::models::TierCounts;

use crate::Result;

/// Source of a user's solved-problem counts.
#[async_trait::async_trait]
pub trait StatsProvider: Send + Sync {
    /// Fails with `ExternalUserNotFound`, `ProviderUnavailable` or
    /// `MalformedResponse`.
    async fn fetch(&self, external_username: &str) -> Result<TierCounts>;

    fn name(&self) -> &'static str;
}
