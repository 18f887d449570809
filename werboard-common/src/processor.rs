//! Submission processing: validate, score, merge, persist
//!
//! One call handles one upload end to end. Any failure before the write
//! leaves the stored leaderboard untouched.

use tracing::info;

use crate::db::Store;
use crate::config::ScoringConfig;
use crate::leaderboard::{validate_username, Leaderboard, LeaderboardEntry, SubmissionOutcome};
use crate::reference::ReferenceSet;
use crate::scoring::WerBreakdown;
use crate::submission::{parse_submission, score_submission, SubmissionRow};
use crate::Result;

/// What one accepted submission did
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    pub username: String,
    pub outcome: SubmissionOutcome,
    pub breakdown: WerBreakdown,
    /// Leaderboard version after the write
    pub version: i64,
    pub leaderboard: Leaderboard,
}

/// Score `rows` and merge the result into a copy of `board`
///
/// `board` itself is never modified, so a rejected submission leaves the
/// caller's leaderboard as it was.
pub fn apply_submission(
    reference: &ReferenceSet,
    board: &Leaderboard,
    username: &str,
    rows: &[SubmissionRow],
) -> Result<(Leaderboard, SubmissionOutcome, WerBreakdown)> {
    let username = validate_username(username)?;
    let breakdown = score_submission(reference, rows)?;

    let mut updated = board.clone();
    let outcome = updated.record_submission(username, breakdown.rate())?;
    Ok((updated, outcome, breakdown))
}

/// Handle one uploaded file for `username` against the stores
///
/// Reads the reference and a leaderboard snapshot, scores the upload, and
/// writes the merged leaderboard back conditioned on the snapshot version.
pub async fn process_submission(
    store: &Store,
    username: &str,
    upload: &[u8],
) -> Result<SubmissionReport> {
    let username = validate_username(username)?.to_string();
    let rows = parse_submission(upload)?;

    let reference = store.fetch_reference().await?;
    let snapshot = store.fetch_leaderboard().await?;

    let (leaderboard, outcome, breakdown) =
        apply_submission(&reference, &snapshot.leaderboard, &username, &rows)?;

    let version = store
        .replace_leaderboard(snapshot.version, &leaderboard)
        .await?;

    info!(
        username = %username,
        wer = breakdown.rate(),
        edits = breakdown.edits,
        reference_words = breakdown.reference_words,
        ?outcome,
        "Accepted submission"
    );

    Ok(SubmissionReport {
        username,
        outcome,
        breakdown,
        version,
        leaderboard,
    })
}

/// Create or overwrite the baseline row with `best_wer`
///
/// An existing baseline keeps its submission count. Returns the new
/// leaderboard version.
pub async fn seed_baseline(store: &Store, scoring: &ScoringConfig, best_wer: f64) -> Result<i64> {
    let snapshot = store.fetch_leaderboard().await?;
    let mut leaderboard = snapshot.leaderboard;

    let submissions = leaderboard
        .get(&scoring.baseline_username)
        .map(|e| e.submissions)
        .unwrap_or(0);
    let entry = LeaderboardEntry::new(scoring.baseline_username.clone(), best_wer, submissions);
    leaderboard.upsert(entry.clone())?;

    store.upsert_entry(&entry).await
}
