//! Common error types for werboard

use thiserror::Error;

/// Common result type for werboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across werboard crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (malformed upload, missing username, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// WER requested over zero utterances
    #[error("Cannot compute WER over an empty corpus")]
    EmptyCorpus,

    /// Reference and hypothesis lists are not aligned
    #[error("Reference and hypothesis counts differ ({references} vs {hypotheses})")]
    LengthMismatch { references: usize, hypotheses: usize },

    /// Every reference transcript is empty, so WER has no denominator
    #[error("Reference transcripts contain no words")]
    EmptyReference,

    /// Submission does not line up with the reference set
    ///
    /// `missing` lists reference IDs without a hypothesis, `unknown` lists
    /// submitted IDs that are not in the reference set.
    #[error("{}", describe_alignment(.missing, .unknown))]
    MissingReferenceEntry {
        missing: Vec<String>,
        unknown: Vec<String>,
    },

    /// The same ID appears more than once in one upload
    #[error("Submission contains duplicate IDs: {}", .0.join(", "))]
    DuplicateSubmissionId(Vec<String>),

    /// No baseline row, so points cannot be anchored
    #[error("Baseline user '{username}' not found. Please ensure a baseline user exists.")]
    MissingBaselineEntry { username: String },

    /// Baseline equals the top-N average, so the points scale is undefined
    #[error(
        "Cannot normalize points: baseline WER {baseline:.3} equals top average {top_average:.3}"
    )]
    DegenerateNormalization { baseline: f64, top_average: f64 },

    /// Leaderboard changed between snapshot and write
    #[error(
        "Leaderboard was updated by another submission (expected version {expected}, found {found}); please resubmit"
    )]
    ConcurrentUpdate { expected: i64, found: i64 },
}

impl Error {
    /// True for errors caused by the request itself rather than the service.
    ///
    /// These are reported back to the user; the service stays usable.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Error::Database(_) | Error::Io(_) | Error::Config(_))
    }
}

/// Cap on IDs listed in one error message
const MAX_LISTED_IDS: usize = 10;

fn describe_alignment(missing: &[String], unknown: &[String]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!(
            "reference IDs without a hypothesis: {}",
            list_ids(missing)
        ));
    }
    if !unknown.is_empty() {
        parts.push(format!(
            "submitted IDs not in the reference: {}",
            list_ids(unknown)
        ));
    }
    format!(
        "Some IDs in the submitted file do not have corresponding entries in the reference file ({})",
        parts.join("; ")
    )
}

fn list_ids(ids: &[String]) -> String {
    if ids.len() <= MAX_LISTED_IDS {
        ids.join(", ")
    } else {
        format!(
            "{} and {} more",
            ids[..MAX_LISTED_IDS].join(", "),
            ids.len() - MAX_LISTED_IDS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_message_names_ids() {
        let err = Error::MissingReferenceEntry {
            missing: vec!["2".to_string()],
            unknown: vec!["9".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("without a hypothesis: 2"));
        assert!(msg.contains("not in the reference: 9"));
    }

    #[test]
    fn test_alignment_message_truncates_long_lists() {
        let missing: Vec<String> = (0..25).map(|i| i.to_string()).collect();
        let err = Error::MissingReferenceEntry {
            missing,
            unknown: Vec::new(),
        };
        let msg = err.to_string();
        assert!(msg.contains("and 15 more"));
        assert!(!msg.contains("not in the reference"));
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::EmptyCorpus.is_user_facing());
        assert!(Error::MissingBaselineEntry {
            username: "baseline".to_string()
        }
        .is_user_facing());
        assert!(!Error::Config("bad".to_string()).is_user_facing());
        assert!(!Error::Io(std::io::Error::other("disk")).is_user_facing());
    }
}
