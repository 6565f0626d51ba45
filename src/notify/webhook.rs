use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use tracing::{info, warn};

use super::NotificationSink;
use crate::models::scan::WebhookRecord;

/// Posts scan records form-encoded to the backend's scan endpoint.
/// Only `201 Created` counts as delivered.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to create webhook HTTP client")?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn notify(&self, record: &WebhookRecord) {
        match self.client.post(&self.url).form(record).send().await {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                if status == StatusCode::CREATED {
                    info!(user_id = %record.user_id, status = record.status.as_str(), "scan record delivered");
                } else {
                    warn!(
                        user_id = %record.user_id,
                        "Failed to deliver scan record, backend answered {}: {}",
                        status,
                        body.trim()
                    );
                }
            }
            Err(e) => warn!(user_id = %record.user_id, "Error while sending scan record: {}", e),
        }
    }
}
