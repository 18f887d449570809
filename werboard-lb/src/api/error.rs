//! Mapping of request failures onto HTTP responses
//!
//! Every variant is recoverable: the request is aborted and reported, the
//! service keeps serving.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};
use werboard_common::Error;

/// Handler error types for HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// Error raised by scoring, validation, or the stores
    Domain(Error),
    /// Malformed or oversized multipart body
    Upload { status: StatusCode, message: String },
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Domain(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => match err {
                Error::ConcurrentUpdate { .. } => StatusCode::CONFLICT,
                Error::Database(_) | Error::Io(_) | Error::Config(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ApiError::Upload { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Domain(err) if err.is_user_facing() => {
                warn!(error = %err, "Request rejected");
                format!("Error processing your file: {}", err)
            }
            ApiError::Domain(err) => {
                error!(error = %err, "Request failed");
                format!("Internal error: {}", err)
            }
            ApiError::Upload { message, .. } => {
                warn!(%status, %message, "Upload rejected");
                format!("Upload error: {}", message)
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
