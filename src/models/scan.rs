use std::path::PathBuf;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};

/// Outcome label reported to the backend for a completed comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanStatus {
    Sukses,
    Gagal,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Sukses => "SUKSES",
            ScanStatus::Gagal => "GAGAL",
        }
    }
}

/// Result of `/recognize`, rendered as the `"1"`/`"0"`/`"2"` status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizeStatus {
    Matched,
    NotMatched,
    UnknownUser,
}

impl RecognizeStatus {
    pub fn code(&self) -> &'static str {
        match self {
            RecognizeStatus::Matched => "1",
            RecognizeStatus::NotMatched => "0",
            RecognizeStatus::UnknownUser => "2",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecognizeResponse {
    pub status: &'static str,
}

impl From<RecognizeStatus> for RecognizeResponse {
    fn from(s: RecognizeStatus) -> Self {
        Self { status: s.code() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    Registered { name: String, face_path: PathBuf },
    /// The upload could not be decoded as an image; nothing was stored.
    NoFace,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_path: Option<String>,
}

impl From<RegisterOutcome> for RegisterResponse {
    fn from(outcome: RegisterOutcome) -> Self {
        match outcome {
            RegisterOutcome::Registered { name, face_path } => Self {
                status: "success",
                message: format!("Face registered as {}", name),
                face_path: Some(face_path.to_string_lossy().to_string()),
            },
            RegisterOutcome::NoFace => Self {
                status: "failed",
                message: "No face detected in the image".to_string(),
                face_path: None,
            },
        }
    }
}

/// The uploaded `file` part of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct ProbeSubmission {
    pub upload: UploadedFile,
    pub username: String,
    pub user_id: String,
    pub panel: String,
    pub kpm: String,
}

/// Form body posted to the scan webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRecord {
    pub user_id: String,
    pub image_path: String,
    pub status: ScanStatus,
    pub panel: String,
    pub kpm: String,
}

/// Answer from the verification delegate for one probe/reference pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub verified: bool,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
}

impl MatchDecision {
    pub fn verified(verified: bool) -> Self {
        Self { verified, distance: None, threshold: None, model: None }
    }
}
