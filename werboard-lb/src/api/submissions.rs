//! Transcript upload endpoint
//!
//! Accepts a multipart form with a `username` text field and a `file` field
//! holding header-less `ID<TAB>hypothesis` lines.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};
use werboard_common::processor::process_submission;
use werboard_common::scoring::{standings, WerBreakdown};
use werboard_common::{Error, SubmissionOutcome};

use super::ApiError;
use crate::view::{format_wer, LeaderboardView};
use crate::AppState;

/// Response for an accepted submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub username: String,
    /// This submission's WER, 3 decimal places
    pub wer: String,
    pub outcome: SubmissionOutcome,
    pub breakdown: WerBreakdown,
    pub leaderboard: LeaderboardView,
}

/// Fields pulled from the multipart body
#[derive(Debug, Default)]
struct SubmissionForm {
    username: Option<String>,
    file: Option<Vec<u8>>,
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, ApiError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("username") => form.username = Some(field.text().await?),
            Some("file") => {
                debug!(file_name = ?field.file_name(), "Receiving upload");
                form.file = Some(field.bytes().await?.to_vec());
            }
            other => debug!(field = ?other, "Ignoring unexpected form field"),
        }
    }

    Ok(form)
}

/// POST /api/submissions
///
/// Scores the uploaded file, merges it into the leaderboard, and returns the
/// updated table. Rejected submissions leave the leaderboard unchanged.
pub async fn submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let form = read_form(multipart).await?;

    let username = form
        .username
        .ok_or_else(|| Error::InvalidInput("Username is required".to_string()))?;
    let upload = form
        .file
        .ok_or_else(|| Error::InvalidInput("A TSV file is required".to_string()))?;

    info!(username = %username.trim(), bytes = upload.len(), "Received submission");

    let report = process_submission(&state.store, &username, &upload).await?;
    let view = LeaderboardView::from(standings(&report.leaderboard, &state.scoring));

    Ok(Json(SubmissionResponse {
        message: outcome_message(&report.username, &report.outcome),
        wer: format_wer(report.outcome.wer()),
        username: report.username,
        outcome: report.outcome,
        breakdown: report.breakdown,
        leaderboard: view,
    }))
}

fn outcome_message(username: &str, outcome: &SubmissionOutcome) -> String {
    match *outcome {
        SubmissionOutcome::Created { wer } => format!(
            "Welcome, {}! Your first submission scored WER {}.",
            username,
            format_wer(wer)
        ),
        SubmissionOutcome::Improved { wer, previous } => format!(
            "New best for {}: WER {} (previous best {}).",
            username,
            format_wer(wer),
            format_wer(previous)
        ),
        SubmissionOutcome::Unchanged { wer, best } => format!(
            "Submission scored WER {}; your best remains {}.",
            format_wer(wer),
            format_wer(best)
        ),
    }
}
