use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::TierCounts;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub id: Uuid,
    pub display_name: String,
    pub external_username: String,
    /// Latest counts reported by LeetCode
    pub current: TierCounts,
    /// Problems solved since the baseline, per tier
    pub gained: TierCounts,
    pub score: i64,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardView {
    pub total_users: i64,
    pub last_global_update: Option<DateTime<Utc>>,
    pub entries: Vec<LeaderboardEntry>,
}

impl LeaderboardView {
    /// Window over the ranked entries. Ranks and totals stay global.
    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.entries = self.entries.into_iter().skip(offset).take(limit).collect();
        self
    }
}
