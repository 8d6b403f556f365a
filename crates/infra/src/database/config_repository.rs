//! SQLite-backed implementation of the ConfigRepository port.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Row};
use slotbook_core::ConfigRepository;
use slotbook_domain::{
    CalendarProviderKind, Result, SchedulerConfig, SlotbookError, WeeklyAvailability,
};
use tracing::instrument;

use super::manager::{run_blocking, DbPool};
use crate::errors::InfraError;

pub struct SqliteConfigRepository {
    pool: DbPool,
}

impl SqliteConfigRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigRepository for SqliteConfigRepository {
    #[instrument(skip(self))]
    async fn get(&self, tenant_id: &str) -> Result<Option<SchedulerConfig>> {
        let tenant_id = tenant_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let result = conn.query_row(
                "SELECT tenant_id, business_name, start_hour, end_hour, weekly_availability, \
                 timezone, calendar_provider, connected_email, notify_email \
                 FROM scheduler_configs WHERE tenant_id = ?1",
                params![tenant_id],
                row_to_config,
            );

            match result {
                Ok(config) => Ok(Some(config)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
    }

    #[instrument(skip(self, config), fields(tenant_id = %config.tenant_id))]
    async fn upsert(&self, config: &SchedulerConfig) -> Result<()> {
        config.validate()?;

        let weekly = config
            .weekly_availability
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| SlotbookError::Internal(format!("failed to encode availability: {e}")))?;

        let config = config.clone();
        run_blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO scheduler_configs (tenant_id, business_name, start_hour, end_hour, \
                 weekly_availability, timezone, calendar_provider, connected_email, notify_email, \
                 updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
                 ON CONFLICT (tenant_id) DO UPDATE SET \
                    business_name = excluded.business_name, \
                    start_hour = excluded.start_hour, \
                    end_hour = excluded.end_hour, \
                    weekly_availability = excluded.weekly_availability, \
                    timezone = excluded.timezone, \
                    calendar_provider = excluded.calendar_provider, \
                    connected_email = excluded.connected_email, \
                    notify_email = excluded.notify_email, \
                    updated_at = excluded.updated_at",
                params![
                    config.tenant_id,
                    config.business_name,
                    config.start_hour,
                    config.end_hour,
                    weekly,
                    config.timezone,
                    config.calendar_provider.as_str(),
                    config.connected_email,
                    config.notify_email,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn mark_provider_connected(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        email: &str,
    ) -> Result<()> {
        let (tenant_id, email) = (tenant_id.to_string(), email.to_string());
        run_blocking(&self.pool, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE scheduler_configs SET calendar_provider = ?1, connected_email = ?2, \
                     updated_at = ?3 WHERE tenant_id = ?4",
                    params![provider.as_str(), email, Utc::now().timestamp(), tenant_id],
                )
                .map_err(InfraError::from)?;

            if updated == 0 {
                return Err(SlotbookError::NotFound(format!(
                    "scheduler config for tenant {tenant_id}"
                )));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn mark_provider_disconnected(&self, tenant_id: &str) -> Result<()> {
        let tenant_id = tenant_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE scheduler_configs SET calendar_provider = 'none', \
                     connected_email = NULL, updated_at = ?1 WHERE tenant_id = ?2",
                    params![Utc::now().timestamp(), tenant_id],
                )
                .map_err(InfraError::from)?;

            if updated == 0 {
                return Err(SlotbookError::NotFound(format!(
                    "scheduler config for tenant {tenant_id}"
                )));
            }
            Ok(())
        })
        .await
    }
}

fn row_to_config(row: &Row<'_>) -> rusqlite::Result<SchedulerConfig> {
    let weekly: Option<String> = row.get(4)?;
    let weekly_availability = weekly
        .map(|json| serde_json::from_str::<WeeklyAvailability>(&json))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    let provider: String = row.get(6)?;
    let calendar_provider = provider
        .parse::<CalendarProviderKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(SchedulerConfig {
        tenant_id: row.get(0)?,
        business_name: row.get(1)?,
        start_hour: row.get(2)?,
        end_hour: row.get(3)?,
        weekly_availability,
        timezone: row.get(5)?,
        calendar_provider,
        connected_email: row.get(7)?,
        notify_email: row.get(8)?,
    })
}
