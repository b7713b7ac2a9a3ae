use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracker::DEFAULT_GRAPHQL_URL;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// In-memory store when unset
    pub database_url: Option<String>,
    pub admin_tokens: String,
    pub graphql_url: String,
    pub rate_limit_delay: Duration,
    pub sync_concurrency: usize,
    /// Zero disables the periodic sync
    pub sync_interval_minutes: u64,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let admin_tokens =
            std::env::var("ADMIN_TOKENS").context("Cannot load ADMIN_TOKENS env variable")?;
        if admin_tokens.split(',').all(|t| t.trim().is_empty()) {
            bail!("ADMIN_TOKENS must contain at least one token");
        }

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "8000")
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            admin_tokens,
            graphql_url: var_or("LEETCODE_GRAPHQL_URL", DEFAULT_GRAPHQL_URL),
            rate_limit_delay: Duration::from_millis(
                var_or("RATE_LIMIT_DELAY_MS", "1000")
                    .parse()
                    .context("RATE_LIMIT_DELAY_MS must be a number")?,
            ),
            sync_concurrency: var_or("SYNC_CONCURRENCY", "1")
                .parse::<usize>()
                .context("SYNC_CONCURRENCY must be a number")?
                .max(1),
            sync_interval_minutes: var_or("SYNC_INTERVAL_MINUTES", "0")
                .parse()
                .context("SYNC_INTERVAL_MINUTES must be a number")?,
            cors_origins: parse_list(&var_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_skips_blanks() {
        assert_eq!(
            parse_list(" http://a.test , ,http://b.test,"),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(parse_list("").is_empty());
    }
}
