pub mod error;
pub mod rate_limit;
pub mod sources;
pub mod sync;
pub mod traits;

pub use error::{Result, SyncError};
pub use rate_limit::RateLimiter;
pub use sources::leetcode::{DEFAULT_GRAPHQL_URL, LeetCodeClient, LeetCodeStats};
pub use sync::{SyncContext, SyncOptions, sync_all, sync_one};
pub use traits::StatsProvider;
