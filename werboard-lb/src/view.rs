//! Display formatting for the leaderboard table
//!
//! Rows are sorted by BestWER ascending and indexed by rank. BestWER is shown
//! to 3 decimal places and Points to 1.

use serde::Serialize;
use werboard_common::scoring::{Standing, Standings};

/// Column headers in display order
pub const COLUMNS: [&str; 5] = ["Rank", "Username", "Best WER", "Submissions", "Points"];

/// One formatted table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub username: String,
    pub best_wer: String,
    pub submissions: i64,
    /// `None` when points could not be computed this pass
    pub points: Option<String>,
}

/// Leaderboard table as sent to the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardView {
    pub columns: [&'static str; 5],
    pub rows: Vec<LeaderboardRow>,
    pub notice: Option<String>,
}

pub fn format_wer(wer: f64) -> String {
    format!("{:.3}", wer)
}

pub fn format_points(points: f64) -> String {
    format!("{:.1}", points)
}

impl From<&Standing> for LeaderboardRow {
    fn from(standing: &Standing) -> Self {
        Self {
            rank: standing.rank,
            username: standing.username.clone(),
            best_wer: format_wer(standing.best_wer),
            submissions: standing.submissions,
            points: standing.points.map(format_points),
        }
    }
}

impl From<Standings> for LeaderboardView {
    fn from(standings: Standings) -> Self {
        Self {
            columns: COLUMNS,
            rows: standings.rows.iter().map(LeaderboardRow::from).collect(),
            notice: standings.notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werboard_common::config::ScoringConfig;
    use werboard_common::scoring::standings;
    use werboard_common::{Leaderboard, LeaderboardEntry};

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_wer(0.1234567), "0.123");
        assert_eq!(format_wer(1.0), "1.000");
        assert_eq!(format_points(14.96), "15.0");
        assert_eq!(format_points(-3.24), "-3.2");
    }

    #[test]
    fn test_view_from_standings() {
        let board = Leaderboard::from_entries(vec![
            LeaderboardEntry::new("baseline", 0.5, 0),
            LeaderboardEntry::new("ann", 0.25, 2),
        ])
        .unwrap();
        let view = LeaderboardView::from(standings(&board, &ScoringConfig::default()));

        assert_eq!(view.rows[0].username, "ann");
        assert_eq!(view.rows[0].rank, 1);
        assert_eq!(view.rows[0].best_wer, "0.250");
        assert_eq!(view.rows[0].points.as_deref(), Some("15.0"));
        assert_eq!(view.rows[1].points.as_deref(), Some("0.0"));
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_view_without_points() {
        let board = Leaderboard::from_entries(vec![LeaderboardEntry::new("ann", 0.25, 2)]).unwrap();
        let view = LeaderboardView::from(standings(&board, &ScoringConfig::default()));
        assert_eq!(view.rows[0].points, None);
        assert!(view.notice.is_some());
    }
}
