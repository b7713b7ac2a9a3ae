pub mod common;
pub mod leaderboard;
pub mod score;
pub mod sync;
pub mod user;
