pub mod tier;
pub mod user;

pub use tier::{Tier, TierCounts, TierWeights};
pub use user::UserRecord;
