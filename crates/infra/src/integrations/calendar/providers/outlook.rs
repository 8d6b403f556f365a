//! Microsoft Graph (Outlook) wire client.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use slotbook_core::BusyQuery;
use slotbook_domain::{
    BusyInterval, CalendarProviderKind, EventDraft, EventPatch, ProviderProfile, Result,
    SlotbookError,
};

use super::{
    event_times, query_window_utc, windows_timezone, ProviderClient, ProviderSettings,
    TokenResponse,
};
use crate::http::HttpClient;

const AUTH_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";
const TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";
const API_BASE: &str = "https://graph.microsoft.com/v1.0";

const SCOPES: &str = "User.Read Calendars.ReadWrite offline_access";

pub struct OutlookClient {
    http: HttpClient,
    settings: ProviderSettings,
    token_url: String,
    api_base: String,
}

impl OutlookClient {
    pub fn new(http: HttpClient, settings: ProviderSettings) -> Self {
        Self {
            http,
            settings,
            token_url: TOKEN_URL.to_string(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Constructor with overridable endpoints for tests against a local
    /// mock server.
    pub fn with_endpoints(
        http: HttpClient,
        settings: ProviderSettings,
        token_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            settings,
            token_url: token_url.into(),
            api_base: api_base.into(),
        }
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let request = self.http.request(Method::POST, &self.token_url).form(form);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(oauth_error(status, &body));
        }

        Ok(response.json::<TokenResponse>().await.map_err(decode_error)?)
    }

    /// The connected mailbox address, needed for `getSchedule` queries.
    async fn own_address(&self, access_token: &str) -> Result<String> {
        let profile = self.fetch_profile(access_token).await?;
        Ok(profile.email)
    }
}

#[async_trait]
impl ProviderClient for OutlookClient {
    fn kind(&self) -> CalendarProviderKind {
        CalendarProviderKind::Outlook
    }

    fn authorization_url(&self, state: &str) -> Result<String> {
        Ok(format!(
            "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&response_mode=query\
             &scope={}&state={}",
            urlencoding::encode(&self.settings.client_id),
            urlencoding::encode(&self.settings.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("scope", SCOPES),
        ])
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
            ("scope", SCOPES),
        ])
        .await
    }

    async fn fetch_busy(&self, access_token: &str, query: &BusyQuery) -> Result<Vec<BusyInterval>> {
        let address = self.own_address(access_token).await?;
        let (start, end) = query_window_utc(query)?;

        // Bounds are converted to UTC before the request so the response
        // (which echoes the request zone) parses without a Windows-zone
        // reverse lookup.
        let body = json!({
            "schedules": [address],
            "startTime": {
                "dateTime": start.to_rfc3339_opts(SecondsFormat::Secs, true),
                "timeZone": "UTC",
            },
            "endTime": {
                "dateTime": end.to_rfc3339_opts(SecondsFormat::Secs, true),
                "timeZone": "UTC",
            },
            "availabilityViewInterval": 30,
        });

        let request = self
            .http
            .request(Method::POST, format!("{}/me/calendar/getSchedule", self.api_base))
            .bearer_auth(access_token)
            .json(&body);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let parsed: GetScheduleResponse = response.json().await.map_err(decode_error)?;
        let mut intervals = Vec::new();
        for schedule in parsed.value {
            for item in schedule.schedule_items {
                // Tentative blocks hold the slot just like firm ones.
                if item.status != "busy" && item.status != "tentative" && item.status != "oof" {
                    continue;
                }
                intervals.push(BusyInterval {
                    start: parse_graph_time(&item.start)?,
                    end: parse_graph_time(&item.end)?,
                });
            }
        }
        intervals.sort_by_key(|interval| interval.start);
        Ok(intervals)
    }

    async fn create_event(&self, access_token: &str, draft: &EventDraft) -> Result<String> {
        let (start, end) = event_times(draft.date, draft.start, draft.duration_minutes);
        let timezone = windows_timezone(&draft.timezone);

        let mut body = json!({
            "subject": draft.subject,
            "body": {"contentType": "HTML", "content": draft.body_html},
            "start": {
                "dateTime": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": timezone,
            },
            "end": {
                "dateTime": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": timezone,
            },
            "attendees": [{
                "emailAddress": {
                    "address": draft.attendee_email,
                    "name": draft.attendee_name,
                },
                "type": "required",
            }],
        });

        if let Some(location) = &draft.location {
            body["location"] = json!({"displayName": location});
        }
        if draft.online_meeting {
            body["isOnlineMeeting"] = json!(true);
            body["onlineMeetingProvider"] = json!("teamsForBusiness");
        }

        let request = self
            .http
            .request(Method::POST, format!("{}/me/calendar/events", self.api_base))
            .bearer_auth(access_token)
            .json(&body);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let created: CreatedEvent = response.json().await.map_err(decode_error)?;
        Ok(created.id)
    }

    async fn update_event(
        &self,
        access_token: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<()> {
        let mut body = json!({});
        if let Some(subject) = &patch.subject {
            body["subject"] = json!(subject);
        }
        if let (Some(date), Some(start), Some(duration), Some(timezone)) =
            (patch.date, patch.start, patch.duration_minutes, patch.timezone.as_deref())
        {
            let (start, end) = event_times(date, start, duration);
            let timezone = windows_timezone(timezone);
            body["start"] = json!({
                "dateTime": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": timezone,
            });
            body["end"] = json!({
                "dateTime": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": timezone,
            });
        }

        let request = self
            .http
            .request(
                Method::PATCH,
                format!("{}/me/calendar/events/{event_id}", self.api_base),
            )
            .bearer_auth(access_token)
            .json(&body);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(())
    }

    async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<()> {
        let request = self
            .http
            .request(
                Method::DELETE,
                format!("{}/me/calendar/events/{event_id}", self.api_base),
            )
            .bearer_auth(access_token);
        let response = self.http.send(request).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(())
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile> {
        let request = self
            .http
            .request(Method::GET, format!("{}/me", self.api_base))
            .bearer_auth(access_token);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let me: MeResponse = response.json().await.map_err(decode_error)?;
        let email = me.mail.or(me.user_principal_name).ok_or_else(|| {
            SlotbookError::Provider("Graph /me returned no mailbox address".into())
        })?;
        Ok(ProviderProfile { email, name: me.display_name })
    }
}

/// Graph schedule items come back as zone-less datetimes in the timezone the
/// request asked for, UTC here.
fn parse_graph_time(value: &GraphDateTime) -> Result<DateTime<Utc>> {
    let trimmed = value.date_time.trim_end_matches('Z');
    // Graph emits fractional seconds of varying width.
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| {
            SlotbookError::Provider(format!("unparseable Graph datetime '{}': {e}", value.date_time))
        })?;
    Ok(DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn decode_error(err: reqwest::Error) -> SlotbookError {
    SlotbookError::Provider(format!("failed to parse Graph response: {err}"))
}

fn api_error(status: StatusCode, body: &str) -> SlotbookError {
    SlotbookError::Provider(format!("Microsoft Graph error ({status}): {body}"))
}

fn oauth_error(status: StatusCode, body: &str) -> SlotbookError {
    #[derive(Deserialize)]
    struct OAuthErrorBody {
        error: String,
    }

    if let Ok(parsed) = serde_json::from_str::<OAuthErrorBody>(body) {
        if parsed.error == "invalid_grant" {
            return SlotbookError::Auth("microsoft refresh token revoked (invalid_grant)".into());
        }
    }
    if status.is_server_error() {
        return SlotbookError::Network(format!("Microsoft token endpoint error ({status})"));
    }
    SlotbookError::Provider(format!("Microsoft token endpoint error ({status}): {body}"))
}

#[derive(Deserialize)]
struct GetScheduleResponse {
    #[serde(default)]
    value: Vec<ScheduleInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleInfo {
    #[serde(default)]
    schedule_items: Vec<ScheduleItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleItem {
    status: String,
    start: GraphDateTime,
    end: GraphDateTime,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDateTime {
    date_time: String,
}

#[derive(Deserialize)]
struct CreatedEvent {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    #[serde(default)]
    mail: Option<String>,
    #[serde(default)]
    user_principal_name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}
