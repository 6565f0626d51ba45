use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::upload::UploadForm;
use crate::error::ScanError;
use crate::models::scan::{ProbeSubmission, RecognizeResponse, RegisterResponse};
use crate::service;
use crate::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    });
    (StatusCode::OK, Json(body))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ScanError> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.take_file()?;
    let name = form.field("name")?;

    let outcome = service::register(&state, &name, upload).await?;
    Ok((StatusCode::OK, Json(RegisterResponse::from(outcome))))
}

pub async fn recognize(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ScanError> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.take_file()?;
    let probe = ProbeSubmission {
        upload,
        username: form.field("username")?,
        user_id: form.field("id")?,
        panel: form.field("panel")?,
        kpm: form.field("kpm")?,
    };

    let status = service::recognize(&state, probe).await?;
    Ok((StatusCode::OK, Json(RecognizeResponse::from(status))))
}
