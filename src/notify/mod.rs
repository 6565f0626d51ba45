//! Outbound reporting of scan outcomes.

mod webhook;

pub use webhook::WebhookNotifier;

use async_trait::async_trait;

use crate::models::scan::WebhookRecord;

/// Receives one record per completed recognition.
///
/// Delivery is best effort: implementations log their own failures and never
/// report them back, so a scan response does not depend on the backend.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, record: &WebhookRecord);
}
