//! HTTP API handlers for werboard-lb

pub mod buildinfo;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod submissions;
pub mod ui;

pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use health::health_routes;
pub use leaderboard::get_leaderboard;
pub use submissions::submit;
pub use ui::{serve_app_js, serve_index};
