//! SQLite persistence for reference transcripts and the leaderboard

pub mod init;
pub mod store;

pub use init::init_database;
pub use store::{LeaderboardSnapshot, Store};
