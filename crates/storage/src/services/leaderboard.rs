use std::cmp::Ordering;

use crate::dto::leaderboard::{LeaderboardEntry, LeaderboardView};
use crate::error::Result;
use crate::models::{TierWeights, UserRecord};

/// Ranks users by score.
///
/// Ordering is score descending, then `created_at` ascending (earlier
/// enrollment wins a tie), then `id` ascending so the order is total and
/// independent of input order. Ranks are 1-based and never shared.
pub fn project(users: &[UserRecord], weights: &TierWeights) -> Result<LeaderboardView> {
    let mut scored = users
        .iter()
        .map(|user| Ok((user.score(weights)?, user)))
        .collect::<Result<Vec<_>>>()?;

    scored.sort_by(|(score_a, a), (score_b, b)| compare_ranked(*score_a, a, *score_b, b));

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(idx, (score, user))| LeaderboardEntry {
            rank: idx as i64 + 1,
            id: user.id,
            display_name: user.display_name.clone(),
            external_username: user.external_username.clone(),
            current: user.current,
            gained: user.gained(),
            score,
            last_synced_at: user.last_synced_at,
            created_at: user.created_at,
        })
        .collect();

    let last_global_update = users.iter().filter_map(|u| u.last_synced_at).max();

    Ok(LeaderboardView {
        total_users: users.len() as i64,
        last_global_update,
        entries,
    })
}

fn compare_ranked(score_a: i64, a: &UserRecord, score_b: i64, b: &UserRecord) -> Ordering {
    score_b
        .cmp(&score_a)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
