//! Signed webhook sink.
//!
//! POSTs a JSON envelope per booking event, signed with HMAC-SHA256 over
//! the exact request body. Receivers verify via `X-Webhook-Signature`.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Method;
use serde_json::json;
use sha2::Sha256;
use slotbook_core::NotificationSink;
use slotbook_domain::{Booking, Result, SchedulerConfig, SlotbookError};
use tracing::{debug, instrument};

use crate::http::HttpClient;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct WebhookSettings {
    /// Target URL; `None` disables the sink entirely.
    pub url: Option<String>,
    pub secret: String,
}

pub struct WebhookSender {
    http: HttpClient,
    settings: WebhookSettings,
}

impl WebhookSender {
    pub fn new(http: HttpClient, settings: WebhookSettings) -> Self {
        Self { http, settings }
    }

    #[instrument(skip(self, booking, config))]
    async fn deliver(
        &self,
        event: &str,
        booking: &Booking,
        config: &SchedulerConfig,
    ) -> Result<()> {
        let Some(url) = self.settings.url.as_deref() else {
            return Ok(());
        };

        let payload = json!({
            "event": event,
            "data": {
                "booking": booking,
                "config": {
                    "businessName": config.business_name,
                    "timezone": config.timezone,
                },
            },
            "timestamp": Utc::now().to_rfc3339(),
        });
        let body = serde_json::to_string(&payload)
            .map_err(|e| SlotbookError::Internal(format!("failed to encode webhook: {e}")))?;

        let signature = sign(self.settings.secret.as_bytes(), body.as_bytes())?;

        let request = self
            .http
            .request(Method::POST, url)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Signature", signature)
            .header("X-Webhook-Event", event)
            .body(body);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SlotbookError::Network(format!(
                "webhook endpoint returned {status}"
            )));
        }
        debug!(event, "webhook delivered");
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WebhookSender {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn booking_created(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()> {
        self.deliver("booking.created", booking, config).await
    }

    async fn booking_updated(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()> {
        self.deliver("booking.updated", booking, config).await
    }

    async fn booking_cancelled(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()> {
        self.deliver("booking.cancelled", booking, config).await
    }
}

/// Hex-encoded HMAC-SHA256 over `body`.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SlotbookError::Internal(format!("invalid webhook secret: {e}")))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
