//! Public availability lookup.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use slotbook_core::scheduling::slots::validate_duration;
use slotbook_domain::Slot;

use crate::context::AppContext;
use crate::response::{ApiError, ApiResponse};

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub duration: u32,
}

pub async fn for_date(
    State(context): State<Arc<AppContext>>,
    Path(slug): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<Slot>>>, ApiError> {
    validate_duration(query.duration)?;

    let tenant = context.tenant_by_slug(&slug).await?;
    let slots = context
        .availability
        .available_slots(&tenant, query.date, query.duration)
        .await?;

    Ok(ApiResponse::ok(slots))
}
