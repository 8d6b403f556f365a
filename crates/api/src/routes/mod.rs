//! Route table and admin auth guard.

mod availability;
mod bookings;
mod health;
mod oauth;
mod schedulers;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::context::AppContext;
use crate::response::ApiError;

/// Build the full route table over a shared context.
pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/schedulers", get(schedulers::list))
        .route("/api/tenants/{slug}/availability", get(availability::for_date))
        .route(
            "/api/tenants/{slug}/bookings",
            post(bookings::create).get(bookings::list_for_date),
        )
        .route(
            "/api/tenants/{slug}/bookings/{id}",
            get(bookings::find).patch(bookings::reschedule).delete(bookings::cancel),
        )
        .route("/api/tenants/{slug}/oauth/{provider}/start", get(oauth::start))
        .route("/api/tenants/{slug}/oauth/{provider}", delete(oauth::disconnect))
        .route("/api/oauth/{provider}/callback", get(oauth::callback))
        .with_state(context)
}

/// Static bearer token check for admin routes.
///
/// With no `admin_token` configured the routes are locked out entirely.
pub(crate) fn require_admin(context: &AppContext, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = context.config.server.admin_token.as_deref() else {
        return Err(ApiError::unauthorized("admin access is not configured"));
    };

    let presented = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::unauthorized("missing or invalid admin token")),
    }
}
