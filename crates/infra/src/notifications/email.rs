//! Transactional email sink (Resend-style HTTP JSON API).

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use slotbook_core::NotificationSink;
use slotbook_domain::{Booking, Result, SchedulerConfig, SlotbookError};
use tracing::{debug, instrument, warn};

use crate::http::HttpClient;

const DEFAULT_API_BASE: &str = "https://api.resend.com";

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub api_key: String,
    /// From-address, e.g. `"Slotbook <bookings@example.com>"`.
    pub from: String,
    /// Override for tests; defaults to the Resend API.
    pub api_base: Option<String>,
}

pub struct EmailSender {
    http: HttpClient,
    api_base: String,
    api_key: String,
    from: String,
}

impl EmailSender {
    pub fn new(http: HttpClient, settings: EmailSettings) -> Self {
        Self {
            http,
            api_base: settings.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: settings.api_key,
            from: settings.from,
        }
    }

    #[instrument(skip(self, html))]
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let request = self
            .http
            .request(Method::POST, format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SlotbookError::Network(format!(
                "email api error ({status}): {text}"
            )));
        }
        debug!(to, subject, "email dispatched");
        Ok(())
    }

    async fn notify_admin(
        &self,
        booking: &Booking,
        config: &SchedulerConfig,
        subject: &str,
        lead: &str,
    ) -> Result<()> {
        let Some(admin) = config.notify_email.as_deref() else {
            return Ok(());
        };
        let html = format!(
            "<p>{lead}</p>{}",
            booking_details_html(booking, config)
        );
        self.send(admin, subject, &html).await
    }

    /// The client email and the admin notification are independent sends; a
    /// failure on one leg must not skip the other.
    async fn send_to_client(&self, booking: &Booking, subject: &str, html: &str) -> Result<()> {
        let result = self.send(&booking.client_email, subject, html).await;
        if let Err(err) = &result {
            warn!(booking_id = %booking.id, error = %err, "client email failed");
        }
        result
    }
}

#[async_trait]
impl NotificationSink for EmailSender {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn booking_created(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()> {
        let subject = format!("Booking confirmed: {}", booking.meeting_type);
        let html = format!(
            "<p>Hi {},</p><p>Your booking with {} is confirmed.</p>{}",
            booking.client_name,
            config.business_name,
            booking_details_html(booking, config)
        );
        let client = self.send_to_client(booking, &subject, &html).await;

        self.notify_admin(
            booking,
            config,
            &format!("New booking: {} with {}", booking.meeting_type, booking.client_name),
            &format!("{} booked a {}.", booking.client_name, booking.meeting_type),
        )
        .await?;
        client
    }

    async fn booking_updated(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()> {
        let subject = format!("Booking rescheduled: {}", booking.meeting_type);
        let html = format!(
            "<p>Hi {},</p><p>Your booking with {} has moved.</p>{}",
            booking.client_name,
            config.business_name,
            booking_details_html(booking, config)
        );
        let client = self.send_to_client(booking, &subject, &html).await;

        self.notify_admin(
            booking,
            config,
            &format!("Booking rescheduled: {}", booking.client_name),
            &format!("{} rescheduled their {}.", booking.client_name, booking.meeting_type),
        )
        .await?;
        client
    }

    async fn booking_cancelled(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()> {
        let subject = format!("Booking cancelled: {}", booking.meeting_type);
        let html = format!(
            "<p>Hi {},</p><p>Your booking with {} on {} at {} has been cancelled.</p>",
            booking.client_name,
            config.business_name,
            booking.date,
            booking.time.display_12h(),
        );
        let client = self.send_to_client(booking, &subject, &html).await;

        self.notify_admin(
            booking,
            config,
            &format!("Booking cancelled: {}", booking.client_name),
            &format!("The {} with {} was cancelled.", booking.meeting_type, booking.client_name),
        )
        .await?;
        client
    }
}

fn booking_details_html(booking: &Booking, config: &SchedulerConfig) -> String {
    let mut details = format!(
        "<ul><li>Date: {}</li><li>Time: {} ({})</li><li>Duration: {} minutes</li>",
        booking.date,
        booking.time.display_12h(),
        config.timezone,
        booking.duration_minutes,
    );
    if let Some(location) = booking.location.as_deref() {
        details.push_str(&format!("<li>Location: {location}</li>"));
    }
    details.push_str("</ul>");
    details
}
