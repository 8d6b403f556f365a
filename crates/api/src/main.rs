//! Slotbook - multi-tenant booking backend.
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use slotbook_api::{router, AppContext};
use slotbook_domain::{Result, SlotbookError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging first so configuration loading is visible.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slotbook=info")),
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(_) => tracing::debug!("no .env file found"),
    }

    let config = slotbook_infra::config::load()?;
    let bind_addr = config.server.bind_addr.clone();

    let context = Arc::new(AppContext::new(config)?);
    let app = router(context);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| SlotbookError::Config(format!("failed to bind {bind_addr}: {e}")))?;
    tracing::info!(%bind_addr, "slotbook listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| SlotbookError::Internal(format!("server error: {e}")))?;

    Ok(())
}
