//! werboard-lb library - leaderboard web service
//!
//! Serves the upload form and leaderboard table, scores uploaded transcripts,
//! and keeps each user's best word error rate.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;
use werboard_common::config::ScoringConfig;
use werboard_common::db::Store;

pub mod api;
pub mod view;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Reference and leaderboard stores
    pub store: Store,
    /// Points normalization parameters
    pub scoring: Arc<ScoringConfig>,
    /// Largest accepted submission request, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Store, scoring: ScoringConfig, max_upload_bytes: usize) -> Self {
        Self {
            store,
            scoring: Arc::new(scoring),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let submissions = Router::new()
        .route("/api/submissions", post(api::submit))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/leaderboard", get(api::get_leaderboard))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(submissions)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
