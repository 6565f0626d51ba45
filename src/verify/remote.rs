use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use super::Verifier;
use crate::models::scan::MatchDecision;

/// Verifier backed by a DeepFace-compatible HTTP `verify` endpoint.
///
/// Both images are sent inline as base64 data URIs, so the service does not
/// need access to this host's filesystem.
#[derive(Clone)]
pub struct RemoteVerifier {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl RemoteVerifier {
    pub fn new(url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create verification HTTP client")?;
        Ok(Self { client, url: url.into(), model: model.into() })
    }

    async fn data_uri(path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let subtype = match image::guess_format(&bytes) {
            Ok(image::ImageFormat::Png) => "png",
            Ok(image::ImageFormat::WebP) => "webp",
            Ok(image::ImageFormat::Bmp) => "bmp",
            _ => "jpeg",
        };
        Ok(format!("data:image/{};base64,{}", subtype, general_purpose::STANDARD.encode(&bytes)))
    }
}

#[async_trait]
impl Verifier for RemoteVerifier {
    async fn compare(&self, probe: &Path, reference: &Path) -> Result<MatchDecision> {
        let body = serde_json::json!({
            "img1": Self::data_uri(probe).await?,
            "img2": Self::data_uri(reference).await?,
            "model_name": self.model,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Verification request failed: {}", e))?;

        let status = response.status();
        let text = response.text().await.context("Failed to read verification response")?;
        if !status.is_success() {
            return Err(anyhow!("Verification service returned {}: {}", status, text.trim()));
        }

        let value: serde_json::Value = serde_json::from_str(&text).context("Failed to parse verification response")?;
        if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
            return Err(anyhow!("{}", err));
        }
        let decision: MatchDecision = serde_json::from_value(value).context("Verification response missing `verified`")?;
        debug!(
            reference = %reference.display(),
            verified = decision.verified,
            distance = ?decision.distance,
            "verification result"
        );
        Ok(decision)
    }
}
