use crate::dto::score::{ScoreBreakdown, TierPoints};
use crate::error::{Result, StorageError};
use crate::models::{Tier, TierCounts, TierWeights};

/// Weighted score of the problems solved since `baseline`.
///
/// Each tier contributes `max(0, current - baseline) * weight`, so a tier
/// that dropped below its baseline (an upstream data correction) counts as
/// zero instead of pulling the score down.
pub fn compute_score(
    baseline: &TierCounts,
    current: &TierCounts,
    weights: &TierWeights,
) -> Result<i64> {
    ensure_valid(baseline, current, weights)?;

    let gained = current.gained_since(baseline);
    Tier::ALL.iter().try_fold(0i64, |score, &tier| {
        tier_points(gained.get(tier), weights.get(tier))?
            .checked_add(score)
            .ok_or_else(overflow)
    })
}

/// Per-tier view of [`compute_score`].
pub fn score_breakdown(
    baseline: &TierCounts,
    current: &TierCounts,
    weights: &TierWeights,
) -> Result<ScoreBreakdown> {
    ensure_valid(baseline, current, weights)?;

    let gained = current.gained_since(baseline);
    let points_for = |tier: Tier| -> Result<TierPoints> {
        let count = gained.get(tier);
        let weight = weights.get(tier);
        Ok(TierPoints {
            gained: count,
            weight,
            points: tier_points(count, weight)?,
        })
    };

    let easy = points_for(Tier::Easy)?;
    let medium = points_for(Tier::Medium)?;
    let hard = points_for(Tier::Hard)?;
    let total_score = easy
        .points
        .checked_add(medium.points)
        .and_then(|sum| sum.checked_add(hard.points))
        .ok_or_else(overflow)?;

    Ok(ScoreBreakdown {
        easy,
        medium,
        hard,
        total_score,
    })
}

fn tier_points(count: i32, weight: i64) -> Result<i64> {
    i64::from(count).checked_mul(weight).ok_or_else(overflow)
}

fn overflow() -> StorageError {
    StorageError::InvalidInput("score overflows a 64-bit integer".to_string())
}

fn ensure_valid(baseline: &TierCounts, current: &TierCounts, weights: &TierWeights) -> Result<()> {
    if !baseline.is_non_negative() {
        return Err(StorageError::InvalidInput(
            "baseline counts must be non-negative".to_string(),
        ));
    }
    if !current.is_non_negative() {
        return Err(StorageError::InvalidInput(
            "current counts must be non-negative".to_string(),
        ));
    }
    if !weights.is_non_negative() {
        return Err(StorageError::InvalidInput(
            "tier weights must be non-negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> TierWeights {
        TierWeights::default()
    }

    #[test]
    fn test_score_from_zero_baseline() {
        let score = compute_score(&TierCounts::ZERO, &TierCounts::new(2, 3, 1), &weights()).unwrap();
        assert_eq!(score, 2 * 1 + 3 * 2 + 1 * 3);
        assert_eq!(score, 11);
    }

    #[test]
    fn test_equal_counts_score_zero() {
        let samples = [
            TierCounts::ZERO,
            TierCounts::new(1, 0, 0),
            TierCounts::new(250, 300, 75),
        ];
        let weight_sets = [
            TierWeights::default(),
            TierWeights::new(0, 0, 0),
            TierWeights::new(5, 7, 11),
        ];

        for baseline in &samples {
            for w in &weight_sets {
                assert_eq!(compute_score(baseline, baseline, w).unwrap(), 0);
            }
        }
    }

    #[test]
    fn test_lower_current_behaves_like_clamped_to_baseline() {
        let baseline = TierCounts::new(10, 20, 30);
        let current = TierCounts::new(4, 25, 29);
        let clamped = TierCounts::new(10, 25, 30);

        assert_eq!(
            compute_score(&baseline, &current, &weights()).unwrap(),
            compute_score(&baseline, &clamped, &weights()).unwrap()
        );
        assert_eq!(compute_score(&baseline, &current, &weights()).unwrap(), 10);
    }

    #[test]
    fn test_custom_weights() {
        let score = compute_score(
            &TierCounts::new(1, 1, 1),
            &TierCounts::new(2, 3, 4),
            &TierWeights::new(10, 100, 1000),
        )
        .unwrap();
        assert_eq!(score, 10 + 200 + 3000);
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        let result = compute_score(&TierCounts::new(-1, 0, 0), &TierCounts::ZERO, &weights());
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));

        let result = compute_score(&TierCounts::ZERO, &TierCounts::new(0, 0, -5), &weights());
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_weights_are_rejected() {
        let result = compute_score(
            &TierCounts::ZERO,
            &TierCounts::new(1, 1, 1),
            &TierWeights::new(1, -2, 3),
        );
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn test_breakdown_matches_score() {
        let baseline = TierCounts::new(5, 5, 5);
        let current = TierCounts::new(8, 4, 7);

        let breakdown = score_breakdown(&baseline, &current, &weights()).unwrap();

        assert_eq!(breakdown.easy.gained, 3);
        assert_eq!(breakdown.easy.points, 3);
        assert_eq!(breakdown.medium.gained, 0);
        assert_eq!(breakdown.medium.points, 0);
        assert_eq!(breakdown.hard.gained, 2);
        assert_eq!(breakdown.hard.weight, 3);
        assert_eq!(breakdown.hard.points, 6);
        assert_eq!(
            breakdown.total_score,
            compute_score(&baseline, &current, &weights()).unwrap()
        );
    }

    #[test]
    fn test_oversized_weights_are_rejected() {
        let current = TierCounts::new(2, 1, 1);

        let heavy_easy = TierWeights::new(i64::MAX, 0, 0);
        let result = compute_score(&TierCounts::ZERO, &current, &heavy_easy);
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));

        let summed = TierWeights::new(i64::MAX, i64::MAX, 0);
        let result = compute_score(&TierCounts::ZERO, &TierCounts::new(1, 1, 0), &summed);
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));

        let heavy_hard = TierWeights::new(1, 1, i64::MAX);
        let result = score_breakdown(&TierCounts::ZERO, &current, &heavy_hard);
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));

        let single = compute_score(&TierCounts::ZERO, &TierCounts::new(1, 0, 0), &heavy_easy);
        assert_eq!(single.unwrap(), i64::MAX);
    }
}
