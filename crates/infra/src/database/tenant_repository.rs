//! SQLite-backed implementation of the TenantRepository port.

use async_trait::async_trait;
use rusqlite::{params, Row};
use slotbook_core::TenantRepository;
use slotbook_domain::{Result, Tenant};
use tracing::instrument;

use super::manager::{run_blocking, DbPool};
use crate::errors::InfraError;

pub struct SqliteTenantRepository {
    pool: DbPool,
}

impl SqliteTenantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for SqliteTenantRepository {
    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>> {
        let slug = slug.to_string();
        run_blocking(&self.pool, move |conn| {
            let result = conn.query_row(
                "SELECT id, slug, display_name, email FROM tenants WHERE slug = ?1",
                params![slug],
                row_to_tenant,
            );

            match result {
                Ok(tenant) => Ok(Some(tenant)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>> {
        let id = id.to_string();
        run_blocking(&self.pool, move |conn| {
            let result = conn.query_row(
                "SELECT id, slug, display_name, email FROM tenants WHERE id = ?1",
                params![id],
                row_to_tenant,
            );

            match result {
                Ok(tenant) => Ok(Some(tenant)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Tenant>> {
        run_blocking(&self.pool, |conn| {
            let mut stmt = conn
                .prepare("SELECT id, slug, display_name, email FROM tenants ORDER BY slug")
                .map_err(InfraError::from)?;

            let rows = stmt.query_map(params![], row_to_tenant).map_err(InfraError::from)?;

            let mut tenants = Vec::new();
            for row in rows {
                tenants.push(row.map_err(InfraError::from)?);
            }
            Ok(tenants)
        })
        .await
    }
}

fn row_to_tenant(row: &Row<'_>) -> rusqlite::Result<Tenant> {
    Ok(Tenant {
        id: row.get(0)?,
        slug: row.get(1)?,
        display_name: row.get(2)?,
        email: row.get(3)?,
    })
}
