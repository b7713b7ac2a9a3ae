use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TierPoints {
    pub gained: i32,
    pub weight: i64,
    pub points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreBreakdown {
    pub easy: TierPoints,
    pub medium: TierPoints,
    pub hard: TierPoints,
    pub total_score: i64,
}
