//! Google Calendar wire client.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use slotbook_core::BusyQuery;
use slotbook_domain::{
    BusyInterval, CalendarProviderKind, EventDraft, EventPatch, ProviderProfile, Result,
    SlotbookError,
};
use uuid::Uuid;

use super::{event_times, query_window_utc, ProviderClient, ProviderSettings, TokenResponse};
use crate::http::HttpClient;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

const SCOPES: &str = "https://www.googleapis.com/auth/calendar \
                      https://www.googleapis.com/auth/userinfo.email \
                      https://www.googleapis.com/auth/userinfo.profile";

pub struct GoogleClient {
    http: HttpClient,
    settings: ProviderSettings,
    token_url: String,
    api_base: String,
    userinfo_url: String,
}

impl GoogleClient {
    pub fn new(http: HttpClient, settings: ProviderSettings) -> Self {
        Self {
            http,
            settings,
            token_url: TOKEN_URL.to_string(),
            api_base: API_BASE.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
        }
    }

    /// Constructor with overridable endpoints for tests against a local
    /// mock server.
    pub fn with_endpoints(
        http: HttpClient,
        settings: ProviderSettings,
        token_url: impl Into<String>,
        api_base: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            settings,
            token_url: token_url.into(),
            api_base: api_base.into(),
            userinfo_url: userinfo_url.into(),
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
}

#[async_trait]
impl ProviderClient for GoogleClient {
    fn kind(&self) -> CalendarProviderKind {
        CalendarProviderKind::Google
    }

    fn authorization_url(&self, state: &str) -> Result<String> {
        Ok(format!(
            "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}\
             &access_type=offline&prompt=consent&state={}",
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
        ])
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn fetch_busy(&self, access_token: &str, query: &BusyQuery) -> Result<Vec<BusyInterval>> {
        let (time_min, time_max) = query_window_utc(query)?;

        let body = json!({
            "timeMin": time_min.to_rfc3339_opts(SecondsFormat::Secs, true),
            "timeMax": time_max.to_rfc3339_opts(SecondsFormat::Secs, true),
            "timeZone": query.timezone,
            "items": [{"id": "primary"}],
        });

        let request = self
            .http
            .request(Method::POST, format!("{}/freeBusy", self.api_base))
            .bearer_auth(access_token)
            .json(&body);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let parsed: FreeBusyResponse = response.json().await.map_err(decode_error)?;
        let mut intervals: Vec<BusyInterval> = parsed
            .calendars
            .into_values()
            .flat_map(|calendar| calendar.busy)
            .map(|period| BusyInterval { start: period.start, end: period.end })
            .collect();
        intervals.sort_by_key(|interval| interval.start);
        Ok(intervals)
    }

    async fn create_event(&self, access_token: &str, draft: &EventDraft) -> Result<String> {
        let (start, end) = event_times(draft.date, draft.start, draft.duration_minutes);

        let mut body = json!({
            "summary": draft.subject,
            "description": draft.body_html,
            "start": {
                "dateTime": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": draft.timezone,
            },
            "end": {
                "dateTime": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": draft.timezone,
            },
            "attendees": [{
                "email": draft.attendee_email,
                "displayName": draft.attendee_name,
            }],
        });

        if let Some(location) = &draft.location {
            body["location"] = json!(location);
        }
        if draft.online_meeting {
            body["conferenceData"] = json!({
                "createRequest": {
                    "requestId": Uuid::new_v4().to_string(),
                    "conferenceSolutionKey": {"type": "hangoutsMeet"},
                }
            });
        }

        let url = if draft.online_meeting {
            format!(
                "{}/calendars/primary/events?sendUpdates=all&conferenceDataVersion=1",
                self.api_base
            )
        } else {
            format!("{}/calendars/primary/events?sendUpdates=all", self.api_base)
        };

        let request = self.http.request(Method::POST, url).bearer_auth(access_token).json(&body);
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
            body["summary"] = json!(subject);
        }
        if let (Some(date), Some(start), Some(duration), Some(timezone)) =
            (patch.date, patch.start, patch.duration_minutes, patch.timezone.as_deref())
        {
            let (start, end) = event_times(date, start, duration);
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
                format!("{}/calendars/primary/events/{event_id}?sendUpdates=all", self.api_base),
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
                format!("{}/calendars/primary/events/{event_id}?sendUpdates=all", self.api_base),
            )
            .bearer_auth(access_token);
        let response = self.http.send(request).await?;

        let status = response.status();
        // The event being gone already is the desired end state.
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
        let request =
            self.http.request(Method::GET, &self.userinfo_url).bearer_auth(access_token);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let profile: UserInfo = response.json().await.map_err(decode_error)?;
        Ok(ProviderProfile { email: profile.email, name: profile.name })
    }
}

fn decode_error(err: reqwest::Error) -> SlotbookError {
    SlotbookError::Provider(format!("failed to parse Google response: {err}"))
}

fn api_error(status: StatusCode, body: &str) -> SlotbookError {
    SlotbookError::Provider(format!("Google API error ({status}): {body}"))
}

/// Token endpoint failures: `invalid_grant` means the refresh token is dead
/// and the credential must be discarded; everything else may be transient.
fn oauth_error(status: StatusCode, body: &str) -> SlotbookError {
    #[derive(Deserialize)]
    struct OAuthErrorBody {
        error: String,
    }

    if let Ok(parsed) = serde_json::from_str::<OAuthErrorBody>(body) {
        if parsed.error == "invalid_grant" {
            return SlotbookError::Auth("google refresh token revoked (invalid_grant)".into());
        }
    }
    if status.is_server_error() {
        return SlotbookError::Network(format!("Google token endpoint error ({status})"));
    }
    SlotbookError::Provider(format!("Google token endpoint error ({status}): {body}"))
}

#[derive(Deserialize)]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: std::collections::HashMap<String, CalendarBusy>,
}

#[derive(Deserialize)]
struct CalendarBusy {
    #[serde(default)]
    busy: Vec<BusyPeriod>,
}

#[derive(Deserialize)]
struct BusyPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct CreatedEvent {
    id: String,
}

#[derive(Deserialize)]
struct UserInfo {
    email: String,
    #[serde(default)]
    name: Option<String>,
}
