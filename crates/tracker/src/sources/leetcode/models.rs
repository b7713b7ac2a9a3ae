use serde::{Deserialize, Serialize};
use storage::models::{Tier, TierCounts};

use crate::error::{Result, SyncError};

pub(super) const USER_STATS_QUERY: &str = r#"
query userProblemsSolved($username: String!) {
    matchedUser(username: $username) {
        submitStatsGlobal {
            acSubmissionNum {
                difficulty
                count
            }
        }
        profile {
            ranking
        }
    }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: UserVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct UserVariables<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    pub submit_stats_global: Option<SubmitStats>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    pub ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub ranking: Option<i64>,
}

/// Stats of one LeetCode account as reported by the GraphQL API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeetCodeStats {
    pub counts: TierCounts,
    /// The "All" bucket as reported upstream
    pub total_solved: Option<i64>,
    pub ranking: Option<i64>,
}

impl GraphQlResponse {
    pub fn into_stats(self, username: &str) -> Result<LeetCodeStats> {
        let matched_user = self.data.and_then(|d| d.matched_user);

        let Some(user) = matched_user else {
            if let Some(error) = self.errors.first() {
                tracing::debug!("GraphQL error for {}: {}", username, error.message);
            }
            return Err(SyncError::ExternalUserNotFound(username.to_string()));
        };

        let stats = user.submit_stats_global.ok_or_else(|| {
            SyncError::MalformedResponse(format!("missing submitStatsGlobal for '{}'", username))
        })?;

        let mut counts = TierCounts::ZERO;
        let mut seen = Vec::with_capacity(Tier::ALL.len());
        let mut total_solved = None;

        for entry in stats.ac_submission_num {
            if entry.count < 0 {
                return Err(SyncError::MalformedResponse(format!(
                    "negative {} count for '{}'",
                    entry.difficulty, username
                )));
            }

            match Tier::from_label(&entry.difficulty) {
                Some(tier) => {
                    let count = i32::try_from(entry.count).map_err(|_| {
                        SyncError::MalformedResponse(format!(
                            "{} count out of range for '{}'",
                            entry.difficulty, username
                        ))
                    })?;
                    counts.set(tier, count);
                    seen.push(tier);
                }
                None if entry.difficulty.eq_ignore_ascii_case("all") => {
                    total_solved = Some(entry.count);
                }
                None => {
                    tracing::debug!("Ignoring unknown difficulty '{}'", entry.difficulty);
                }
            }
        }

        if let Some(missing) = Tier::ALL.iter().find(|t| !seen.contains(t)) {
            return Err(SyncError::MalformedResponse(format!(
                "missing {} count for '{}'",
                missing.as_str(),
                username
            )));
        }

        Ok(LeetCodeStats {
            counts,
            total_solved,
            ranking: user.profile.and_then(|p| p.ranking),
        })
    }
}
