pub mod aggregate;
pub mod leaderboard;
pub mod stats;
