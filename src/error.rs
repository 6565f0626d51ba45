use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// Failures surfaced to HTTP callers. Validation problems map to 400, the
/// rest to 500. Unknown users and undecodable registrations are outcomes, not
/// errors, and never appear here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("No selected file")]
    EmptyFilename,
    #[error("{0} not provided")]
    MissingField(&'static str),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Malformed upload: {1}")]
    Multipart(StatusCode, String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0:#}")]
    Verification(anyhow::Error),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ScanError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScanError::MissingFile
            | ScanError::EmptyFilename
            | ScanError::MissingField(_)
            | ScanError::InvalidName(_) => StatusCode::BAD_REQUEST,
            ScanError::Multipart(status, _) => *status,
            ScanError::Io(_) | ScanError::Verification(_) | ScanError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
