use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// LeetCode difficulty class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Maps a provider difficulty label ("Easy", "MEDIUM", ...) to a tier.
    /// Aggregate labels such as "All" have no tier.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Solved-problem counts broken down by tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct TierCounts {
    pub easy: i32,
    pub medium: i32,
    pub hard: i32,
}

impl TierCounts {
    pub const ZERO: TierCounts = TierCounts {
        easy: 0,
        medium: 0,
        hard: 0,
    };

    pub fn new(easy: i32, medium: i32, hard: i32) -> Self {
        Self { easy, medium, hard }
    }

    pub fn get(&self, tier: Tier) -> i32 {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
        }
    }

    pub fn set(&mut self, tier: Tier, count: i32) {
        match tier {
            Tier::Easy => self.easy = count,
            Tier::Medium => self.medium = count,
            Tier::Hard => self.hard = count,
        }
    }

    pub fn is_non_negative(&self) -> bool {
        self.easy >= 0 && self.medium >= 0 && self.hard >= 0
    }

    pub fn total(&self) -> i64 {
        i64::from(self.easy) + i64::from(self.medium) + i64::from(self.hard)
    }

    /// Per-tier `max(0, self - baseline)`.
    pub fn gained_since(&self, baseline: &TierCounts) -> TierCounts {
        TierCounts {
            easy: (self.easy - baseline.easy).max(0),
            medium: (self.medium - baseline.medium).max(0),
            hard: (self.hard - baseline.hard).max(0),
        }
    }
}

/// Points awarded per solved problem of each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TierWeights {
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
}

impl TierWeights {
    pub fn new(easy: i64, medium: i64, hard: i64) -> Self {
        Self { easy, medium, hard }
    }

    pub fn get(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
        }
    }

    pub fn is_non_negative(&self) -> bool {
        self.easy >= 0 && self.medium >= 0 && self.hard >= 0
    }
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            easy: 1,
            medium: 2,
            hard: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_label() {
        assert_eq!(Tier::from_label("Easy"), Some(Tier::Easy));
        assert_eq!(Tier::from_label("MEDIUM"), Some(Tier::Medium));
        assert_eq!(Tier::from_label(" hard "), Some(Tier::Hard));
        assert_eq!(Tier::from_label("All"), None);
        assert_eq!(Tier::from_label(""), None);
    }

    #[test]
    fn test_gained_since_clamps_each_tier() {
        let baseline = TierCounts::new(10, 5, 2);
        let current = TierCounts::new(12, 3, 2);

        assert_eq!(current.gained_since(&baseline), TierCounts::new(2, 0, 0));
    }

    #[test]
    fn test_set_and_get_round_trip_every_tier() {
        let mut counts = TierCounts::ZERO;
        for (i, tier) in Tier::ALL.into_iter().enumerate() {
            counts.set(tier, i as i32 + 1);
        }

        assert_eq!(counts, TierCounts::new(1, 2, 3));
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_default_weights() {
        let weights = TierWeights::default();
        assert_eq!(weights.get(Tier::Easy), 1);
        assert_eq!(weights.get(Tier::Medium), 2);
        assert_eq!(weights.get(Tier::Hard), 3);
    }
}
