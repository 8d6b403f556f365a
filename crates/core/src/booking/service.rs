//! Booking transaction coordinator.
//!
//! Drives every booking state change through the same sequence:
//! validate, recheck availability, best-effort external event, persist,
//! notify. Only the persist step is allowed to fail a request once
//! validation and the recheck have passed.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use slotbook_domain::{
    Booking, BookingRequest, BookingStatus, EventDraft, EventPatch, LocationType, MeetingType,
    Result, SchedulerConfig, SlotbookError, Tenant, TimeOfDay,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::booking::ports::{BookingRepository, ConfigRepository, MeetingTypeRepository};
use crate::booking::validate::validate_request;
use crate::calendar_ports::CalendarGateway;
use crate::notify_ports::NotificationSink;
use crate::scheduling::{conflicts, slots};

/// Schedule fields of a reschedule request.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub duration_minutes: u32,
}

pub struct BookingCoordinator {
    configs: Arc<dyn ConfigRepository>,
    bookings: Arc<dyn BookingRepository>,
    meeting_types: Arc<dyn MeetingTypeRepository>,
    calendar: Arc<dyn CalendarGateway>,
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl BookingCoordinator {
    pub fn new(
        configs: Arc<dyn ConfigRepository>,
        bookings: Arc<dyn BookingRepository>,
        meeting_types: Arc<dyn MeetingTypeRepository>,
        calendar: Arc<dyn CalendarGateway>,
        sinks: Vec<Arc<dyn NotificationSink>>,
    ) -> Self {
        Self { configs, bookings, meeting_types, calendar, sinks }
    }

    /// Confirm a new booking.
    #[instrument(skip(self, tenant, request), fields(tenant_id = %tenant.id))]
    pub async fn create_booking(
        &self,
        tenant: &Tenant,
        request: BookingRequest,
    ) -> Result<Booking> {
        self.create_booking_at(tenant, request, Utc::now()).await
    }

    /// [`create_booking`](Self::create_booking) with an explicit clock.
    pub async fn create_booking_at(
        &self,
        tenant: &Tenant,
        request: BookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let config = self.config_for(tenant).await?;
        let meeting_type = self.meeting_type_for(tenant, &request.meeting_type).await?;

        validate_request(&request, &meeting_type)?;
        self.recheck_slot(tenant, &config, request.date, request.time, request.duration_minutes, None, now)
            .await?;

        let mut booking = Booking {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant.id.clone(),
            date: request.date,
            time: request.time,
            duration_minutes: request.duration_minutes,
            meeting_type: request.meeting_type,
            client_name: request.client_name,
            client_email: request.client_email,
            client_phone: request.client_phone,
            notes: request.notes,
            location_type: request.location_type.or(Some(meeting_type.location_type)),
            location: request.location.or_else(|| meeting_type.location.clone()),
            external_event_id: None,
            status: BookingStatus::Confirmed,
            created_at: now,
        };

        booking.external_event_id = self.create_external_event(tenant, &config, &booking).await;

        if let Err(err) = self.bookings.insert(&booking).await {
            // The external event, if any, now has no backing booking; record
            // enough to reconcile it manually.
            if let Some(event_id) = booking.external_event_id.as_deref() {
                tracing::error!(
                    tenant_id = %tenant.id,
                    provider = config.calendar_provider.as_str(),
                    external_event_id = event_id,
                    error = %err,
                    "booking insert failed after external event creation"
                );
            }
            return Err(err);
        }

        self.notify(&booking, &config, NotifyKind::Created).await;
        Ok(booking)
    }

    /// Cancel a confirmed booking. Cancelling twice is a no-op success.
    #[instrument(skip(self, tenant), fields(tenant_id = %tenant.id, booking_id))]
    pub async fn cancel_booking(&self, tenant: &Tenant, booking_id: &str) -> Result<Booking> {
        let config = self.config_for(tenant).await?;
        let mut booking = self
            .bookings
            .find_by_id(&tenant.id, booking_id)
            .await?
            .ok_or_else(|| SlotbookError::NotFound(format!("booking {booking_id}")))?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        if let Some(event_id) = booking.external_event_id.as_deref() {
            if let Err(err) = self
                .calendar
                .delete_event(&tenant.id, config.calendar_provider, event_id)
                .await
            {
                warn!(%booking.id, error = %err, "external event delete failed");
            }
        }

        self.bookings.set_status(&tenant.id, &booking.id, BookingStatus::Cancelled).await?;
        booking.status = BookingStatus::Cancelled;

        self.notify(&booking, &config, NotifyKind::Cancelled).await;
        Ok(booking)
    }

    /// Move a confirmed booking to a new date/time/duration.
    #[instrument(skip(self, tenant, update), fields(tenant_id = %tenant.id, booking_id))]
    pub async fn update_booking(
        &self,
        tenant: &Tenant,
        booking_id: &str,
        update: BookingUpdate,
    ) -> Result<Booking> {
        self.update_booking_at(tenant, booking_id, update, Utc::now()).await
    }

    pub async fn update_booking_at(
        &self,
        tenant: &Tenant,
        booking_id: &str,
        update: BookingUpdate,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let config = self.config_for(tenant).await?;
        let mut booking = self
            .bookings
            .find_by_id(&tenant.id, booking_id)
            .await?
            .ok_or_else(|| SlotbookError::NotFound(format!("booking {booking_id}")))?;

        if booking.status == BookingStatus::Cancelled {
            return Err(SlotbookError::Validation("cannot reschedule a cancelled booking".into()));
        }

        slots::validate_duration(update.duration_minutes)?;
        self.recheck_slot(
            tenant,
            &config,
            update.date,
            update.time,
            update.duration_minutes,
            Some(&booking.id),
            now,
        )
        .await?;

        booking.date = update.date;
        booking.time = update.time;
        booking.duration_minutes = update.duration_minutes;

        if let Some(event_id) = booking.external_event_id.as_deref() {
            let patch = EventPatch {
                subject: None,
                date: Some(booking.date),
                start: Some(booking.time),
                duration_minutes: Some(booking.duration_minutes),
                timezone: Some(config.timezone.clone()),
            };
            if let Err(err) = self
                .calendar
                .update_event(&tenant.id, config.calendar_provider, event_id, &patch)
                .await
            {
                warn!(%booking.id, error = %err, "external event update failed");
            }
        }

        self.bookings.update(&booking).await?;

        self.notify(&booking, &config, NotifyKind::Updated).await;
        Ok(booking)
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

    async fn meeting_type_for(&self, tenant: &Tenant, name: &str) -> Result<MeetingType> {
        match self.meeting_types.find_by_name(&tenant.id, name).await? {
            Some(mt) => Ok(mt),
            None => Err(SlotbookError::Validation(format!("unknown meeting type: {name}"))),
        }
    }

    /// Recheck the requested slot against the current confirmed bookings,
    /// not the client's stale view of availability. External busy intervals
    /// are deliberately not consulted here; the unique index backstops
    /// whatever slips through anyway.
    async fn recheck_slot(
        &self,
        tenant: &Tenant,
        config: &SchedulerConfig,
        date: NaiveDate,
        time: TimeOfDay,
        duration_minutes: u32,
        exclude_booking: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let candidates = slots::candidate_slots(config, date, duration_minutes, now)?;
        if !candidates.contains(&time) {
            return Err(SlotbookError::Conflict(format!(
                "slot {time} on {date} is not available"
            )));
        }

        let mut bookings = self.bookings.list_confirmed_for_date(&tenant.id, date).await?;
        if let Some(id) = exclude_booking {
            bookings.retain(|b| b.id != id);
        }

        if conflicts::conflicts(time, duration_minutes, &bookings, &[]) {
            return Err(SlotbookError::Conflict(format!(
                "slot {time} on {date} is already booked"
            )));
        }

        Ok(())
    }

    /// Best-effort event creation; any failure is logged and the booking
    /// proceeds without an external event id.
    async fn create_external_event(
        &self,
        tenant: &Tenant,
        config: &SchedulerConfig,
        booking: &Booking,
    ) -> Option<String> {
        if !config.calendar_provider.is_connected_kind() {
            return None;
        }

        let draft = event_draft(config, booking);
        match self
            .calendar
            .create_event(&tenant.id, config.calendar_provider, &draft)
            .await
        {
            Ok(event_id) => event_id,
            Err(err) => {
                warn!(
                    tenant_id = %tenant.id,
                    provider = config.calendar_provider.as_str(),
                    error = %err,
                    "external event creation failed, booking proceeds without it"
                );
                None
            }
        }
    }

    async fn notify(&self, booking: &Booking, config: &SchedulerConfig, kind: NotifyKind) {
        for sink in &self.sinks {
            let outcome = match kind {
                NotifyKind::Created => sink.booking_created(booking, config).await,
                NotifyKind::Updated => sink.booking_updated(booking, config).await,
                NotifyKind::Cancelled => sink.booking_cancelled(booking, config).await,
            };
            if let Err(err) = outcome {
                warn!(sink = sink.name(), %booking.id, error = %err, "notification failed");
            }
        }
    }
}

#[derive(Clone, Copy)]
enum NotifyKind {
    Created,
    Updated,
    Cancelled,
}

/// Build the external calendar event for a booking.
fn event_draft(config: &SchedulerConfig, booking: &Booking) -> EventDraft {
    let mut body = format!(
        "<p>{} with {}</p><p>Email: {}</p>",
        booking.meeting_type, booking.client_name, booking.client_email
    );
    if let Some(phone) = booking.client_phone.as_deref() {
        body.push_str(&format!("<p>Phone: {phone}</p>"));
    }
    if let Some(notes) = booking.notes.as_deref() {
        body.push_str(&format!("<p>Notes: {notes}</p>"));
    }

    EventDraft {
        subject: format!("{}: {}", booking.meeting_type, booking.client_name),
        body_html: body,
        date: booking.date,
        start: booking.time,
        duration_minutes: booking.duration_minutes,
        timezone: config.timezone.clone(),
        attendee_email: booking.client_email.clone(),
        attendee_name: booking.client_name.clone(),
        location: booking.location.clone(),
        online_meeting: booking.location_type == Some(LocationType::Virtual),
    }
}
