//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;
use crate::response::{ApiError, ApiResponse};

#[derive(Serialize)]
pub struct HealthStatus {
    pub database: bool,
}

pub async fn health(
    State(context): State<Arc<AppContext>>,
) -> Result<Json<ApiResponse<HealthStatus>>, ApiError> {
    context.db.health_check()?;
    Ok(ApiResponse::ok(HealthStatus { database: true }))
}
