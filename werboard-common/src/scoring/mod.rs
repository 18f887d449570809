//! Scoring: corpus word-error-rate and leaderboard normalization

pub mod normalizer;
pub mod wer;

pub use normalizer::{assign_ranks, compute_points, standings, Standing, Standings};
pub use wer::{corpus_wer, WerBreakdown};
