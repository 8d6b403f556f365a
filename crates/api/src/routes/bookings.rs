//! Booking endpoints: create, look up, reschedule, cancel.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use slotbook_core::BookingUpdate;
use slotbook_domain::{Booking, BookingRequest, SlotbookError};

use crate::context::AppContext;
use crate::response::{ApiError, ApiResponse};
use crate::routes::require_admin;

pub async fn create(
    State(context): State<Arc<AppContext>>,
    Path(slug): Path<String>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let tenant = context.tenant_by_slug(&slug).await?;
    let booking = context.coordinator.create_booking(&tenant, request).await?;
    Ok(ApiResponse::ok(booking))
}

#[derive(Deserialize)]
pub struct BookingListQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Admin listing of confirmed bookings, for one date or an inclusive range.
pub async fn list_for_date(
    State(context): State<Arc<AppContext>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<Vec<Booking>>>, ApiError> {
    require_admin(&context, &headers)?;

    let tenant = context.tenant_by_slug(&slug).await?;
    let bookings = match (query.date, query.start_date, query.end_date) {
        (Some(date), None, None) => {
            context.bookings.list_confirmed_for_date(&tenant.id, date).await?
        }
        (None, Some(start), Some(end)) => {
            if start > end {
                return Err(SlotbookError::Validation(
                    "start_date must not be after end_date".into(),
                )
                .into());
            }
            context.bookings.list_confirmed_in_range(&tenant.id, start, end).await?
        }
        _ => {
            return Err(SlotbookError::Validation(
                "provide either date or both start_date and end_date".into(),
            )
            .into())
        }
    };
    Ok(ApiResponse::ok(bookings))
}

pub async fn find(
    State(context): State<Arc<AppContext>>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let tenant = context.tenant_by_slug(&slug).await?;
    let booking = context
        .bookings
        .find_by_id(&tenant.id, &id)
        .await?
        .ok_or_else(|| SlotbookError::NotFound(format!("booking {id}")))?;
    Ok(ApiResponse::ok(booking))
}

/// Admin reschedule to a new date, time, and duration.
pub async fn reschedule(
    State(context): State<Arc<AppContext>>,
    Path((slug, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(update): Json<BookingUpdate>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    require_admin(&context, &headers)?;

    let tenant = context.tenant_by_slug(&slug).await?;
    let booking = context.coordinator.update_booking(&tenant, &id, update).await?;
    Ok(ApiResponse::ok(booking))
}

/// Admin cancel. Cancelling an already-cancelled booking succeeds.
pub async fn cancel(
    State(context): State<Arc<AppContext>>,
    Path((slug, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    require_admin(&context, &headers)?;

    let tenant = context.tenant_by_slug(&slug).await?;
    let booking = context.coordinator.cancel_booking(&tenant, &id).await?;
    Ok(ApiResponse::ok(booking))
}
