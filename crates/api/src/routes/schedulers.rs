//! Public directory of booking pages.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;
use crate::response::{ApiError, ApiResponse};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerEntry {
    pub id: String,
    pub slug: String,
    pub business_name: String,
}

/// Every tenant with a bookable page. Tenants without saved configuration
/// show their display name.
pub async fn list(
    State(context): State<Arc<AppContext>>,
) -> Result<Json<ApiResponse<Vec<SchedulerEntry>>>, ApiError> {
    let tenants = context.tenants.list().await?;
    let mut entries = Vec::with_capacity(tenants.len());
    for tenant in tenants {
        let business_name = match context.configs.get(&tenant.id).await? {
            Some(config) => config.business_name,
            None => tenant.display_name.clone(),
        };
        entries.push(SchedulerEntry { id: tenant.id, slug: tenant.slug, business_name });
    }

    Ok(ApiResponse::ok(entries))
}
