use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{TierCounts, TierWeights};
use crate::error::Result;
use crate::services::scoring::compute_score;

/// A tracked LeetCode user.
///
/// Score is never stored; it is derived from `baseline` and `current` on
/// every read (see [`UserRecord::score`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub id: Uuid,
    pub display_name: String,
    pub external_username: String,
    /// Counts captured at enrollment or at the last baseline reset
    pub baseline: TierCounts,
    /// Counts from the most recent successful fetch
    pub current: TierCounts,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Enrolls a user. With `initial` counts the baseline and current counts
    /// both start there; without them the baseline is deferred until the
    /// first successful sync.
    pub fn enroll(
        display_name: impl Into<String>,
        external_username: impl Into<String>,
        initial: Option<TierCounts>,
        now: DateTime<Utc>,
    ) -> Self {
        let counts = initial.unwrap_or(TierCounts::ZERO);

        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            external_username: external_username.into(),
            baseline: counts,
            current: counts,
            last_synced_at: initial.map(|_| now),
            created_at: now,
        }
    }

    pub fn has_synced(&self) -> bool {
        self.last_synced_at.is_some()
    }

    pub fn score(&self, weights: &TierWeights) -> Result<i64> {
        compute_score(&self.baseline, &self.current, weights)
    }

    pub fn gained(&self) -> TierCounts {
        self.current.gained_since(&self.baseline)
    }

    /// Applies freshly fetched counts. A record that was never synced takes
    /// the fetched counts as its baseline as well.
    pub fn with_fetched_counts(mut self, counts: TierCounts, fetched_at: DateTime<Utc>) -> Self {
        if !self.has_synced() {
            self.baseline = counts;
        }
        self.current = counts;
        self.last_synced_at = Some(fetched_at);
        self
    }
}
