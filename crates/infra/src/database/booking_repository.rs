//! SQLite-backed implementation of the BookingRepository port.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use slotbook_core::BookingRepository;
use slotbook_domain::{Booking, BookingStatus, Result, SlotbookError, TimeOfDay};
use tracing::{debug, instrument};

use super::manager::{run_blocking, DbPool};
use crate::errors::InfraError;

const BOOKING_COLUMNS: &str = "id, tenant_id, date, time, duration_minutes, meeting_type, \
                               client_name, client_email, client_phone, notes, location_type, \
                               location, external_event_id, status, created_at";

pub struct SqliteBookingRepository {
    pool: DbPool,
}

impl SqliteBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, tenant_id = %booking.tenant_id))]
    async fn insert(&self, booking: &Booking) -> Result<()> {
        let booking = booking.clone();
        run_blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO bookings (id, tenant_id, date, time, duration_minutes, meeting_type, \
                 client_name, client_email, client_phone, notes, location_type, location, \
                 external_event_id, status, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    booking.id,
                    booking.tenant_id,
                    booking.date.to_string(),
                    booking.time.minutes(),
                    booking.duration_minutes,
                    booking.meeting_type,
                    booking.client_name,
                    booking.client_email,
                    booking.client_phone,
                    booking.notes,
                    booking.location_type.map(|l| l.as_str()),
                    booking.location,
                    booking.external_event_id,
                    booking.status.as_str(),
                    booking.created_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await?;

        debug!("booking stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Booking>> {
        let (tenant_id, id) = (tenant_id.to_string(), id.to_string());
        run_blocking(&self.pool, move |conn| {
            let result = conn.query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE tenant_id = ?1 AND id = ?2"),
                params![tenant_id, id],
                row_to_booking,
            );

            match result {
                Ok(booking) => Ok(Some(booking)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_confirmed_for_date(
        &self,
        tenant_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Booking>> {
        let tenant_id = tenant_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE tenant_id = ?1 AND date = ?2 AND status = 'confirmed' \
                     ORDER BY time"
                ))
                .map_err(InfraError::from)?;

            let rows = stmt
                .query_map(params![tenant_id, date.to_string()], row_to_booking)
                .map_err(InfraError::from)?;

            collect_bookings(rows)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_confirmed_in_range(
        &self,
        tenant_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Booking>> {
        let tenant_id = tenant_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE tenant_id = ?1 AND date >= ?2 AND date <= ?3 AND status = 'confirmed' \
                     ORDER BY date, time"
                ))
                .map_err(InfraError::from)?;

            let rows = stmt
                .query_map(
                    params![tenant_id, start.to_string(), end.to_string()],
                    row_to_booking,
                )
                .map_err(InfraError::from)?;

            collect_bookings(rows)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_status(&self, tenant_id: &str, id: &str, status: BookingStatus) -> Result<()> {
        let (tenant_id, id) = (tenant_id.to_string(), id.to_string());
        run_blocking(&self.pool, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE bookings SET status = ?1 WHERE tenant_id = ?2 AND id = ?3",
                    params![status.as_str(), tenant_id, id],
                )
                .map_err(InfraError::from)?;

            if updated == 0 {
                return Err(SlotbookError::NotFound(format!("booking {id}")));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_external_event_id(
        &self,
        tenant_id: &str,
        id: &str,
        event_id: Option<&str>,
    ) -> Result<()> {
        let (tenant_id, id) = (tenant_id.to_string(), id.to_string());
        let event_id = event_id.map(str::to_string);
        run_blocking(&self.pool, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE bookings SET external_event_id = ?1 WHERE tenant_id = ?2 AND id = ?3",
                    params![event_id, tenant_id, id],
                )
                .map_err(InfraError::from)?;

            if updated == 0 {
                return Err(SlotbookError::NotFound(format!("booking {id}")));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn update(&self, booking: &Booking) -> Result<()> {
        let booking = booking.clone();
        run_blocking(&self.pool, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE bookings SET date = ?1, time = ?2, duration_minutes = ?3, \
                     external_event_id = ?4, status = ?5 \
                     WHERE tenant_id = ?6 AND id = ?7",
                    params![
                        booking.date.to_string(),
                        booking.time.minutes(),
                        booking.duration_minutes,
                        booking.external_event_id,
                        booking.status.as_str(),
                        booking.tenant_id,
                        booking.id,
                    ],
                )
                .map_err(InfraError::from)?;

            if updated == 0 {
                return Err(SlotbookError::NotFound(format!("booking {}", booking.id)));
            }
            Ok(())
        })
        .await
    }
}

fn collect_bookings(
    rows: impl Iterator<Item = rusqlite::Result<Booking>>,
) -> Result<Vec<Booking>> {
    let mut bookings = Vec::new();
    for row in rows {
        bookings.push(row.map_err(InfraError::from)?);
    }
    Ok(bookings)
}

fn row_to_booking(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let date: String = row.get(2)?;
    let date = date
        .parse::<NaiveDate>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let minutes: u32 = row.get(3)?;
    let time = TimeOfDay::from_minutes(minutes)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))?;

    let location_type: Option<String> = row.get(10)?;
    let location_type = location_type
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: SlotbookError| {
            rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e))
        })?;

    let status: String = row.get(13)?;
    let status = match status.as_str() {
        "confirmed" => BookingStatus::Confirmed,
        "cancelled" => BookingStatus::Cancelled,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                13,
                Type::Text,
                format!("unknown booking status: {other}").into(),
            ))
        }
    };

    let created_at: i64 = row.get(14)?;
    let created_at = Utc.timestamp_opt(created_at, 0).single().ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            14,
            Type::Integer,
            format!("invalid unix timestamp: {created_at}").into(),
        )
    })?;

    Ok(Booking {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        date,
        time,
        duration_minutes: row.get(4)?,
        meeting_type: row.get(5)?,
        client_name: row.get(6)?,
        client_email: row.get(7)?,
        client_phone: row.get(8)?,
        notes: row.get(9)?,
        location_type,
        location: row.get(11)?,
        external_event_id: row.get(12)?,
        status,
        created_at,
    })
}
