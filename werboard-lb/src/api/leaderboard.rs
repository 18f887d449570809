//! Leaderboard table endpoint

use axum::{extract::State, Json};
use werboard_common::scoring::standings;

use super::ApiError;
use crate::view::LeaderboardView;
use crate::AppState;

/// GET /api/leaderboard
///
/// Reads a fresh snapshot, derives ranks and points, and returns the
/// formatted table. Missing baseline or degenerate normalization is reported
/// in `notice`, not as an error.
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardView>, ApiError> {
    let snapshot = state.store.fetch_leaderboard().await?;
    let view = LeaderboardView::from(standings(&snapshot.leaderboard, &state.scoring));
    Ok(Json(view))
}
