//! # werboard common library
//!
//! Shared code for the werboard leaderboard service:
//! - Error type and configuration loading
//! - Reference transcripts and uploaded submissions
//! - Word-error-rate scoring and leaderboard normalization
//! - SQLite-backed reference and leaderboard stores

pub mod config;
pub mod db;
pub mod error;
pub mod leaderboard;
pub mod processor;
pub mod reference;
pub mod scoring;
pub mod submission;
mod tsv;

pub use error::{Error, Result};
pub use leaderboard::{Leaderboard, LeaderboardEntry, SubmissionOutcome};
pub use reference::{ReferenceEntry, ReferenceSet};
pub use submission::SubmissionRow;
