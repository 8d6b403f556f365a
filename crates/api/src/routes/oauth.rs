//! OAuth connect endpoints for tenant admins.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use slotbook_domain::CalendarProviderKind;

use crate::context::AppContext;
use crate::response::{ApiError, ApiResponse};
use crate::routes::require_admin;

fn parse_provider(value: &str) -> Result<CalendarProviderKind, ApiError> {
    value.parse::<CalendarProviderKind>().map_err(ApiError::from)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationStart {
    pub authorization_url: String,
}

/// Hand the admin the provider consent URL.
pub async fn start(
    State(context): State<Arc<AppContext>>,
    Path((slug, provider)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<AuthorizationStart>>, ApiError> {
    require_admin(&context, &headers)?;

    let provider = parse_provider(&provider)?;
    let tenant = context.tenant_by_slug(&slug).await?;
    let authorization_url = context.oauth.start(&tenant, provider)?;

    Ok(ApiResponse::ok(AuthorizationStart { authorization_url }))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Set by the provider when the user denied consent.
    #[serde(default)]
    pub error: Option<String>,
}

/// Provider redirect target. Renders a plain page the admin's browser tab
/// shows after the consent screen.
pub async fn callback(
    State(context): State<Arc<AppContext>>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Html<String> {
    if let Some(error) = query.error {
        return callback_page("Connection failed", &format!("The provider reported: {error}"));
    }

    let (Some(code), Some(state)) = (query.code, query.state) else {
        return callback_page("Connection failed", "Missing code or state parameter.");
    };

    match context.oauth.complete(&code, &state).await {
        Ok((_, profile)) => callback_page(
            "Calendar connected",
            &format!("{} is now linked. You can close this tab.", profile.email),
        ),
        Err(err) => {
            tracing::warn!(provider, error = %err, "oauth callback failed");
            callback_page("Connection failed", "The authorization could not be completed.")
        }
    }
}

/// Remove the stored credential and flip the tenant back to internal-only.
pub async fn disconnect(
    State(context): State<Arc<AppContext>>,
    Path((slug, provider)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&context, &headers)?;

    let provider = parse_provider(&provider)?;
    let tenant = context.tenant_by_slug(&slug).await?;
    context.oauth.disconnect(&tenant, provider).await?;

    Ok(ApiResponse::ok(()))
}

fn callback_page(title: &str, message: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html><head><title>{title}</title></head>\
         <body style=\"font-family: sans-serif; text-align: center; padding-top: 4rem\">\
         <h1>{title}</h1><p>{message}</p></body></html>"
    ))
}
