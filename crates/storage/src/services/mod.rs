pub mod baseline;
pub mod leaderboard;
pub mod scoring;
