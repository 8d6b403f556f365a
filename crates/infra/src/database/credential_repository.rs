//! SQLite-backed implementation of the CredentialRepository port.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use slotbook_core::CredentialRepository;
use slotbook_domain::{CalendarProviderKind, OAuthCredential, Result};
use tracing::instrument;

use super::manager::{run_blocking, DbPool};
use crate::errors::InfraError;

pub struct SqliteCredentialRepository {
    pool: DbPool,
}

impl SqliteCredentialRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for SqliteCredentialRepository {
    #[instrument(skip(self, credential), fields(tenant_id = %credential.tenant_id, provider = %credential.provider))]
    async fn store(&self, credential: &OAuthCredential) -> Result<()> {
        let credential = credential.clone();
        run_blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO oauth_credentials (tenant_id, provider, access_token, refresh_token, \
                 expires_at, scope, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
                 ON CONFLICT (tenant_id, provider) DO UPDATE SET \
                    access_token = excluded.access_token, \
                    refresh_token = excluded.refresh_token, \
                    expires_at = excluded.expires_at, \
                    scope = excluded.scope, \
                    updated_at = excluded.updated_at",
                params![
                    credential.tenant_id,
                    credential.provider.as_str(),
                    credential.access_token,
                    credential.refresh_token,
                    credential.expires_at.timestamp(),
                    credential.scope,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn load(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<Option<OAuthCredential>> {
        let tenant_id = tenant_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let result = conn.query_row(
                "SELECT tenant_id, provider, access_token, refresh_token, expires_at, scope \
                 FROM oauth_credentials WHERE tenant_id = ?1 AND provider = ?2",
                params![tenant_id, provider.as_str()],
                row_to_credential,
            );

            match result {
                Ok(credential) => Ok(Some(credential)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, tenant_id: &str, provider: CalendarProviderKind) -> Result<()> {
        let tenant_id = tenant_id.to_string();
        run_blocking(&self.pool, move |conn| {
            conn.execute(
                "DELETE FROM oauth_credentials WHERE tenant_id = ?1 AND provider = ?2",
                params![tenant_id, provider.as_str()],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
    }
}

fn row_to_credential(row: &Row<'_>) -> rusqlite::Result<OAuthCredential> {
    let provider: String = row.get(1)?;
    let provider = provider
        .parse::<CalendarProviderKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    let expires_at: i64 = row.get(4)?;
    let expires_at = Utc.timestamp_opt(expires_at, 0).single().ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Integer,
            format!("invalid unix timestamp: {expires_at}").into(),
        )
    })?;

    Ok(OAuthCredential {
        tenant_id: row.get(0)?,
        provider,
        access_token: row.get(2)?,
        refresh_token: row.get(3)?,
        expires_at,
        scope: row.get(5)?,
    })
}
