//! Per-user best scores and the merge rule for new submissions

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// One leaderboard row as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub best_wer: f64,
    pub submissions: i64,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, best_wer: f64, submissions: i64) -> Self {
        Self {
            username: username.into(),
            best_wer,
            submissions,
        }
    }
}

/// Result of merging one scored submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// First valid submission for this user
    Created { wer: f64 },
    /// New WER beat the stored best
    Improved { wer: f64, previous: f64 },
    /// New WER did not beat the stored best; only the count moved
    Unchanged { wer: f64, best: f64 },
}

impl SubmissionOutcome {
    pub fn wer(&self) -> f64 {
        match *self {
            SubmissionOutcome::Created { wer }
            | SubmissionOutcome::Improved { wer, .. }
            | SubmissionOutcome::Unchanged { wer, .. } => wer,
        }
    }
}

/// Whole leaderboard in store order
///
/// Usernames are unique. BestWER only moves down; Submissions only moves up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Build from stored rows, rejecting duplicates and invalid scores
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Result<Self> {
        let mut board = Self::default();
        for entry in entries {
            validate_wer(entry.best_wer)?;
            if entry.submissions < 0 {
                return Err(Error::InvalidInput(format!(
                    "Negative submission count for '{}'",
                    entry.username
                )));
            }
            if board.get(&entry.username).is_some() {
                return Err(Error::InvalidInput(format!(
                    "Duplicate leaderboard username '{}'",
                    entry.username
                )));
            }
            board.entries.push(entry);
        }
        Ok(board)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn get(&self, username: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.username == username)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge a scored submission for `username`
    ///
    /// New users are appended with one submission. Existing users always gain
    /// one submission; their best WER is replaced only by a strictly lower one.
    pub fn record_submission(&mut self, username: &str, wer: f64) -> Result<SubmissionOutcome> {
        let username = validate_username(username)?;
        validate_wer(wer)?;

        let outcome = match self.entries.iter_mut().find(|e| e.username == username) {
            Some(entry) => {
                entry.submissions += 1;
                if wer < entry.best_wer {
                    let previous = entry.best_wer;
                    entry.best_wer = wer;
                    SubmissionOutcome::Improved { wer, previous }
                } else {
                    SubmissionOutcome::Unchanged {
                        wer,
                        best: entry.best_wer,
                    }
                }
            }
            None => {
                self.entries.push(LeaderboardEntry::new(username, wer, 1));
                SubmissionOutcome::Created { wer }
            }
        };

        debug!(username, ?outcome, "Merged submission into leaderboard");
        Ok(outcome)
    }

    /// Insert or overwrite a row wholesale (administrative seeding)
    pub fn upsert(&mut self, entry: LeaderboardEntry) -> Result<()> {
        validate_username(&entry.username)?;
        validate_wer(entry.best_wer)?;
        match self.entries.iter_mut().find(|e| e.username == entry.username) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }
}

/// Trimmed, non-empty username
pub fn validate_username(username: &str) -> Result<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Username is required".to_string()));
    }
    Ok(trimmed)
}

fn validate_wer(wer: f64) -> Result<()> {
    if !wer.is_finite() || wer < 0.0 {
        return Err(Error::InvalidInput(format!("Invalid WER value: {}", wer)));
    }
    Ok(())
}
