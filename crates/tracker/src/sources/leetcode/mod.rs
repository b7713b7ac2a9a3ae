mod client;
mod models;

pub use client::{DEFAULT_GRAPHQL_URL, LeetCodeClient};
pub use models::LeetCodeStats;
