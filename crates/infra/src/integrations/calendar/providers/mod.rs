//! Provider wire clients.
//!
//! One implementation per calendar service, behind a common trait so the
//! token vault and gateway never branch on provider specifics.

pub mod google;
pub mod outlook;
mod timezone_map;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;
use slotbook_core::BusyQuery;
use slotbook_domain::{
    parse_timezone, BusyInterval, CalendarProviderKind, EventDraft, EventPatch, ProviderProfile,
    Result, SlotbookError,
};

pub use timezone_map::windows_timezone;

/// OAuth client settings for one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Token endpoint response, shared by the exchange and refresh calls.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Absent when the provider does not rotate refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Wire-level operations against one calendar service.
///
/// `refresh_token` distinguishes terminal from transient failures:
/// an `invalid_grant`-class rejection surfaces as `SlotbookError::Auth`,
/// anything else (network, timeout, 5xx) as `Network`/`Provider`.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> CalendarProviderKind;

    /// Authorization URL the tenant admin is sent to.
    fn authorization_url(&self, state: &str) -> Result<String>;

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse>;

    async fn fetch_busy(&self, access_token: &str, query: &BusyQuery) -> Result<Vec<BusyInterval>>;

    /// Returns the created event's provider-side id.
    async fn create_event(&self, access_token: &str, draft: &EventDraft) -> Result<String>;

    async fn update_event(
        &self,
        access_token: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<()>;

    /// An already-deleted event counts as success.
    async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<()>;

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile>;
}

/// Lookup table from provider kind to client, built once at startup.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    clients: HashMap<CalendarProviderKind, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.clients.insert(client.kind(), client);
        self
    }

    pub fn client(&self, kind: CalendarProviderKind) -> Result<Arc<dyn ProviderClient>> {
        self.clients.get(&kind).cloned().ok_or_else(|| {
            SlotbookError::Config(format!("calendar provider '{kind}' is not configured"))
        })
    }

    pub fn is_configured(&self, kind: CalendarProviderKind) -> bool {
        self.clients.contains_key(&kind)
    }
}

/// UTC bounds of the query's tenant-local working window.
pub(crate) fn query_window_utc(query: &BusyQuery) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = parse_timezone(&query.timezone)?;

    let local_bound = |hour: u8| -> Result<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(u32::from(hour.min(23)), 0, 0)
            .unwrap_or(NaiveTime::MIN);
        let naive = query.date.and_time(time);
        naive
            .and_local_timezone(tz)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                SlotbookError::Validation(format!(
                    "time {naive} does not exist in timezone {}",
                    query.timezone
                ))
            })
    };

    let start = local_bound(query.start_hour)?;
    let end = if query.end_hour >= 24 {
        let next = query.date.succ_opt().ok_or_else(|| {
            SlotbookError::Validation("date out of supported range".into())
        })?;
        let naive = next.and_time(NaiveTime::MIN);
        naive
            .and_local_timezone(tz)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| SlotbookError::Validation("midnight does not exist".into()))?
    } else {
        local_bound(query.end_hour)?
    };

    Ok((start, end))
}

/// UTC instants of an event's start and end for request bodies.
pub(crate) fn event_times(
    date: chrono::NaiveDate,
    start: slotbook_domain::TimeOfDay,
    duration_minutes: u32,
) -> (chrono::NaiveDateTime, chrono::NaiveDateTime) {
    let start_naive = date.and_time(
        NaiveTime::from_hms_opt(start.hour(), start.minute(), 0).unwrap_or(NaiveTime::MIN),
    );
    let end_naive = start_naive + chrono::Duration::minutes(i64::from(duration_minutes));
    (start_naive, end_naive)
}
