//! Rank and points derivation over the whole leaderboard
//!
//! Points map BestWER onto a capped scale anchored at two references: the
//! baseline entry earns 0 and the mean of the top N entries earns the cap.
//! Entries worse than the baseline get negative points; there is no floor.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::warn;

use crate::config::ScoringConfig;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::{Error, Result};

/// Min ("competition") rank over BestWER ascending, in leaderboard order
///
/// Ties share the lowest rank; the next distinct value's rank is one plus the
/// number of entries strictly better than it.
pub fn assign_ranks(board: &Leaderboard) -> Vec<u32> {
    let entries = board.entries();
    entries
        .iter()
        .map(|entry| {
            let better = entries
                .iter()
                .filter(|other| other.best_wer < entry.best_wer)
                .count();
            better as u32 + 1
        })
        .collect()
}

/// Mean of the `n` lowest BestWER values (or of all, when fewer exist)
pub fn top_average(board: &Leaderboard, n: usize) -> Option<f64> {
    let mut scores: Vec<f64> = board.entries().iter().map(|e| e.best_wer).collect();
    scores.sort_by(f64::total_cmp);
    let top = &scores[..scores.len().min(n)];
    if top.is_empty() {
        return None;
    }
    Some(top.iter().sum::<f64>() / top.len() as f64)
}

/// Points for every entry, in leaderboard order
///
/// `points = min(cap, cap * (baseline - wer) / (baseline - top_average))`
///
/// # Errors
/// - [`Error::MissingBaselineEntry`] when no row carries the baseline username
/// - [`Error::DegenerateNormalization`] when baseline equals the top average,
///   or any result would not be finite
pub fn compute_points(board: &Leaderboard, config: &ScoringConfig) -> Result<Vec<f64>> {
    let baseline = board
        .get(&config.baseline_username)
        .map(|e| e.best_wer)
        .ok_or_else(|| Error::MissingBaselineEntry {
            username: config.baseline_username.clone(),
        })?;

    // Baseline row exists, so the board is non-empty
    let top = top_average(board, config.top_n).unwrap_or(baseline);
    let span = baseline - top;
    let degenerate = || Error::DegenerateNormalization {
        baseline,
        top_average: top,
    };

    if span.abs() <= f64::EPSILON {
        return Err(degenerate());
    }

    board
        .entries()
        .iter()
        .map(|entry| {
            let raw = config.max_points * (baseline - entry.best_wer) / span;
            if !raw.is_finite() {
                return Err(degenerate());
            }
            // Baseline lands on -0.0 when span < 0
            let points = if raw == 0.0 { 0.0 } else { raw };
            Ok(points.min(config.max_points))
        })
        .collect()
}

/// One displayed row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub rank: u32,
    pub username: String,
    pub best_wer: f64,
    pub submissions: i64,
    /// `None` when normalization failed for this pass
    pub points: Option<f64>,
}

/// Leaderboard ready for display, sorted by BestWER ascending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standings {
    pub rows: Vec<Standing>,
    /// Why points are missing, when they are
    pub notice: Option<String>,
}

/// Rank, normalize, and sort the leaderboard
///
/// A normalization failure does not abort: rows are still returned with
/// `points: None` and the failure message in `notice`.
pub fn standings(board: &Leaderboard, config: &ScoringConfig) -> Standings {
    let ranks = assign_ranks(board);
    let (points, notice): (Vec<Option<f64>>, Option<String>) = match compute_points(board, config) {
        Ok(points) => (points.into_iter().map(Some).collect(), None),
        Err(e) => {
            warn!(error = %e, entries = board.len(), "Points normalization skipped");
            (vec![None; board.len()], Some(e.to_string()))
        }
    };

    let mut rows: Vec<Standing> = board
        .entries()
        .iter()
        .zip(ranks)
        .zip(points)
        .map(|((entry, rank), points)| standing(entry, rank, points))
        .collect();

    rows.sort_by(|a, b| match a.best_wer.total_cmp(&b.best_wer) {
        Ordering::Equal => a.username.cmp(&b.username),
        other => other,
    });

    Standings { rows, notice }
}

fn standing(entry: &LeaderboardEntry, rank: u32, points: Option<f64>) -> Standing {
    Standing {
        rank,
        username: entry.username.clone(),
        best_wer: entry.best_wer,
        submissions: entry.submissions,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[(&str, f64)]) -> Leaderboard {
        Leaderboard::from_entries(
            rows.iter()
                .map(|&(name, wer)| LeaderboardEntry::new(name, wer, 1))
                .collect(),
        )
        .unwrap()
    }

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn test_ranks_share_lowest_on_ties() {
        let b = board(&[("a", 0.3), ("b", 0.1), ("c", 0.3), ("d", 0.5), ("e", 0.1)]);
        assert_eq!(assign_ranks(&b), vec![3, 1, 3, 5, 1]);
    }

    #[test]
    fn test_top_average_with_fewer_entries() {
        let b = board(&[("a", 0.2), ("b", 0.4)]);
        assert!((top_average(&b, 3).unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(top_average(&Leaderboard::default(), 3), None);
    }

    #[test]
    fn test_points_anchor_and_cap() {
        // top3 = (0.1 + 0.2 + 0.3) / 3 = 0.2
        let b = board(&[("baseline", 0.5), ("a", 0.1), ("b", 0.2), ("c", 0.3), ("d", 0.8)]);
        let points = compute_points(&b, &config()).unwrap();
        assert_eq!(points[0], 0.0);
        assert_eq!(points[1], 15.0); // capped from 20
        assert!((points[2] - 15.0).abs() < 1e-9);
        assert!((points[3] - 10.0).abs() < 1e-9);
        assert!((points[4] + 15.0).abs() < 1e-9); // below baseline stays negative
        assert!(points.iter().all(|&p| p <= 15.0));
    }

    #[test]
    fn test_baseline_points_exactly_zero_when_baseline_is_best() {
        // Baseline below the top average flips the span sign
        let b = board(&[("baseline", 0.1), ("a", 0.5), ("b", 0.6)]);
        let points = compute_points(&b, &config()).unwrap();
        assert_eq!(points[0].to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn test_missing_baseline_reported() {
        let b = board(&[("a", 0.1), ("b", 0.2)]);
        assert!(matches!(
            compute_points(&b, &config()),
            Err(Error::MissingBaselineEntry { username }) if username == "baseline"
        ));
    }

    #[test]
    fn test_only_baseline_is_degenerate() {
        let b = board(&[("baseline", 0.5)]);
        assert!(matches!(
            compute_points(&b, &config()),
            Err(Error::DegenerateNormalization { .. })
        ));
    }

    #[test]
    fn test_all_equal_is_degenerate() {
        let b = board(&[("baseline", 0.4), ("a", 0.4), ("b", 0.4), ("c", 0.4)]);
        assert!(matches!(
            compute_points(&b, &config()),
            Err(Error::DegenerateNormalization { .. })
        ));
    }

    #[test]
    fn test_custom_scoring_parameters() {
        let cfg = ScoringConfig {
            baseline_username: "ref".to_string(),
            max_points: 10.0,
            top_n: 1,
        };
        let b = board(&[("ref", 0.6), ("a", 0.2), ("b", 0.4)]);
        let points = compute_points(&b, &cfg).unwrap();
        assert_eq!(points[0], 0.0);
        assert!((points[1] - 10.0).abs() < 1e-9);
        assert!((points[2] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_standings_sorted_with_ranks_and_points() {
        let b = board(&[("baseline", 0.5), ("z", 0.2), ("a", 0.2), ("m", 0.1)]);
        let s = standings(&b, &config());
        assert!(s.notice.is_none());
        let names: Vec<&str> = s.rows.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["m", "a", "z", "baseline"]);
        let ranks: Vec<u32> = s.rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 4]);
        assert_eq!(s.rows[3].points, Some(0.0));
    }

    #[test]
    fn test_standings_keep_rows_when_normalization_fails() {
        let b = board(&[("a", 0.3), ("b", 0.1)]);
        let s = standings(&b, &config());
        assert_eq!(s.rows.len(), 2);
        assert!(s.rows.iter().all(|r| r.points.is_none()));
        assert!(s.notice.unwrap().contains("Baseline user 'baseline' not found"));
    }
}
