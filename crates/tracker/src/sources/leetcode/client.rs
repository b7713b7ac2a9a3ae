use std::time::Duration;

use reqwest::{StatusCode, header};
use storage::models::TierCounts;

use super::models::{GraphQlRequest, GraphQlResponse, LeetCodeStats, USER_STATS_QUERY, UserVariables};
use crate::error::{Result, SyncError};
use crate::traits::StatsProvider;

pub const DEFAULT_GRAPHQL_URL: &str = "https://leetcode.com/graphql";

/// Client for the public LeetCode GraphQL endpoint.
pub struct LeetCodeClient {
    endpoint: String,
    client: reqwest::Client,
}

impl LeetCodeClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("leetcode-leaderboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_stats(&self, username: &str) -> Result<LeetCodeStats> {
        let request = GraphQlRequest {
            query: USER_STATS_QUERY,
            variables: UserVariables { username },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::REFERER, "https://leetcode.com")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SyncError::ProviderUnavailable(format!(
                "HTTP {} while fetching '{}'",
                status, username
            )));
        }

        let body = response.json::<GraphQlResponse>().await?;
        body.into_stats(username)
    }
}

#[async_trait::async_trait]
impl StatsProvider for LeetCodeClient {
    async fn fetch(&self, external_username: &str) -> Result<TierCounts> {
        let stats = self.fetch_stats(external_username).await?;
        Ok(stats.counts)
    }

    fn name(&self) -> &'static str {
        "LeetCode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Needs network access to leetcode.com
    async fn test_fetch_known_user() {
        let client = LeetCodeClient::new(DEFAULT_GRAPHQL_URL).unwrap();
        let stats = client.fetch_stats("leetcode").await.unwrap();
        assert!(stats.counts.is_non_negative());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let client = LeetCodeClient::new("http://127.0.0.1:9/graphql").unwrap();

        let result = client.fetch("alice").await;

        assert!(matches!(result, Err(SyncError::ProviderUnavailable(_))));
    }
}
