//! SQLite-backed implementation of the MeetingTypeRepository port.

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Row};
use slotbook_core::MeetingTypeRepository;
use slotbook_domain::{LocationType, MeetingType, Result};
use tracing::instrument;

use super::manager::{run_blocking, DbPool};
use crate::errors::InfraError;

pub struct SqliteMeetingTypeRepository {
    pool: DbPool,
}

impl SqliteMeetingTypeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeetingTypeRepository for SqliteMeetingTypeRepository {
    #[instrument(skip(self))]
    async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<MeetingType>> {
        let tenant_id = tenant_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, tenant_id, name, duration_minutes, description, color, \
                     location_type, location FROM meeting_types WHERE tenant_id = ?1 ORDER BY name",
                )
                .map_err(InfraError::from)?;

            let rows = stmt
                .query_map(params![tenant_id], row_to_meeting_type)
                .map_err(InfraError::from)?;

            let mut meeting_types = Vec::new();
            for row in rows {
                meeting_types.push(row.map_err(InfraError::from)?);
            }
            Ok(meeting_types)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, tenant_id: &str, name: &str) -> Result<Option<MeetingType>> {
        let (tenant_id, name) = (tenant_id.to_string(), name.to_string());
        run_blocking(&self.pool, move |conn| {
            let result = conn.query_row(
                "SELECT id, tenant_id, name, duration_minutes, description, color, \
                 location_type, location FROM meeting_types WHERE tenant_id = ?1 AND name = ?2",
                params![tenant_id, name],
                row_to_meeting_type,
            );

            match result {
                Ok(meeting_type) => Ok(Some(meeting_type)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
    }
}

fn row_to_meeting_type(row: &Row<'_>) -> rusqlite::Result<MeetingType> {
    let location_type: String = row.get(6)?;
    let location_type = location_type
        .parse::<LocationType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(MeetingType {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        duration_minutes: row.get(3)?,
        description: row.get(4)?,
        color: row.get(5)?,
        location_type,
        location: row.get(7)?,
    })
}
