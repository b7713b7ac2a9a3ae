use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::score::ScoreBreakdown;
use crate::error::Result;
use crate::models::{TierCounts, TierWeights, UserRecord};
use crate::services::scoring::score_breakdown;

/// Full view of a tracked user, including the derived score
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub display_name: String,
    pub external_username: String,
    pub baseline: TierCounts,
    pub current: TierCounts,
    pub score: i64,
    pub breakdown: ScoreBreakdown,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn build(user: UserRecord, weights: &TierWeights) -> Result<Self> {
        let breakdown = score_breakdown(&user.baseline, &user.current, weights)?;

        Ok(Self {
            id: user.id,
            display_name: user.display_name,
            external_username: user.external_username,
            baseline: user.baseline,
            current: user.current,
            score: breakdown.total_score,
            breakdown,
            last_synced_at: user.last_synced_at,
            created_at: user.created_at,
        })
    }
}

/// Request payload for enrolling a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[serde(alias = "username")]
    #[validate(length(
        min = 1,
        max = 50,
        message = "Display name must be between 1 and 50 characters"
    ))]
    #[validate(custom(function = "validate_not_blank"))]
    pub display_name: String,

    #[serde(alias = "leetcode_username")]
    #[validate(length(
        min = 1,
        max = 50,
        message = "LeetCode username must be between 1 and 50 characters"
    ))]
    #[validate(custom(function = "validate_external_username"))]
    pub external_username: String,
}

/// Request payload for editing a tracked user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50))]
    #[validate(custom(function = "validate_not_blank"))]
    pub display_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    #[validate(custom(function = "validate_external_username"))]
    pub external_username: Option<String>,
}

impl UpdateUserRequest {
    /// Applies the given fields. Pointing a user at another LeetCode account
    /// drops the old counts; the next sync captures a fresh baseline.
    pub fn apply(&self, mut user: UserRecord) -> UserRecord {
        if let Some(ref name) = self.display_name {
            user.display_name = name.trim().to_string();
        }
        if let Some(ref username) = self.external_username
            && *username != user.external_username
        {
            user.external_username = username.clone();
            user.baseline = TierCounts::ZERO;
            user.current = TierCounts::ZERO;
            user.last_synced_at = None;
        }
        user
    }
}

fn validate_not_blank(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

// LeetCode usernames are letters, digits, '-' and '_'
fn validate_external_username(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_username"))
    }
}
