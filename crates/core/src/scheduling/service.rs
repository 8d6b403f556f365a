//! Availability computation over the repositories and calendar gateway.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use slotbook_domain::{Result, SchedulerConfig, Slot, SlotbookError, Tenant};
use tracing::{instrument, warn};

use crate::booking::ports::{BookingRepository, ConfigRepository};
use crate::calendar_ports::{BusyQuery, CalendarGateway};
use crate::scheduling::{conflicts, slots};

/// Computes open slots for a tenant and date.
///
/// Provider trouble degrades the result to internal conflicts only; it
/// never fails the request.
pub struct AvailabilityService {
    configs: Arc<dyn ConfigRepository>,
    bookings: Arc<dyn BookingRepository>,
    calendar: Arc<dyn CalendarGateway>,
}

impl AvailabilityService {
    pub fn new(
        configs: Arc<dyn ConfigRepository>,
        bookings: Arc<dyn BookingRepository>,
        calendar: Arc<dyn CalendarGateway>,
    ) -> Self {
        Self { configs, bookings, calendar }
    }

    /// Open slots for `tenant` on `date`, ordered by start time. An empty
    /// list is a valid result (closed day, fully booked, past date).
    #[instrument(skip(self, tenant), fields(tenant_id = %tenant.id, %date, duration_minutes))]
    pub async fn available_slots(
        &self,
        tenant: &Tenant,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> Result<Vec<Slot>> {
        self.available_slots_at(tenant, date, duration_minutes, Utc::now()).await
    }

    /// Same as [`available_slots`](Self::available_slots) with an explicit
    /// clock, used by the booking recheck and tests.
    pub async fn available_slots_at(
        &self,
        tenant: &Tenant,
        date: NaiveDate,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Slot>> {
        let config = self.config_for(tenant).await?;

        let candidates = slots::candidate_slots(&config, date, duration_minutes, now)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let bookings = self.bookings.list_confirmed_for_date(&tenant.id, date).await?;
        let busy_windows = self.busy_windows(tenant, &config, date).await;

        let free =
            conflicts::filter_conflicts(candidates, duration_minutes, &bookings, &busy_windows);
        Ok(free.into_iter().map(Slot::new).collect())
    }

    async fn config_for(&self, tenant: &Tenant) -> Result<SchedulerConfig> {
        match self.configs.get(&tenant.id).await? {
            Some(config) => Ok(config),
            None => Err(SlotbookError::NotFound(format!(
                "scheduler config for tenant {}",
                tenant.slug
            ))),
        }
    }

    /// Busy windows from the external calendar, in tenant-local minutes.
    ///
    /// Any failure here is logged and swallowed; availability keeps working
    /// on internal bookings alone.
    async fn busy_windows(
        &self,
        tenant: &Tenant,
        config: &SchedulerConfig,
        date: NaiveDate,
    ) -> Vec<(i32, i32)> {
        if !config.calendar_provider.is_connected_kind() {
            return Vec::new();
        }

        // Query the provider over the day's effective working window, which
        // may differ from the global hours when a per-weekday override is set.
        let hours = config.hours_for(date.weekday());
        let query = BusyQuery {
            date,
            start_hour: hours.start_hour,
            end_hour: hours.end_hour,
            timezone: config.timezone.clone(),
        };

        let busy = match self
            .calendar
            .fetch_busy_intervals(&tenant.id, config.calendar_provider, &query)
            .await
        {
            Ok(busy) => busy,
            Err(err) => {
                warn!(
                    tenant_id = %tenant.id,
                    provider = config.calendar_provider.as_str(),
                    error = %err,
                    "busy lookup failed, serving internal availability only"
                );
                return Vec::new();
            }
        };

        let tz = match slotbook_domain::parse_timezone(&config.timezone) {
            Ok(tz) => tz,
            Err(err) => {
                warn!(tenant_id = %tenant.id, error = %err, "unusable tenant timezone");
                return Vec::new();
            }
        };

        conflicts::busy_windows_for_date(&busy, tz, date)
    }
}
