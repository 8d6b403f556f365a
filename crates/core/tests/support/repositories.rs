//! In-memory mocks for the repository and notification ports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use slotbook_core::{
    BookingRepository, ConfigRepository, MeetingTypeRepository, NotificationSink,
};
use slotbook_domain::{
    Booking, BookingStatus, CalendarProviderKind, LocationType, MeetingType,
    Result as DomainResult, SchedulerConfig, SlotbookError,
};

/// In-memory `ConfigRepository` seeded with one config per tenant.
#[derive(Default, Clone)]
pub struct MockConfigRepository {
    configs: Arc<Mutex<HashMap<String, SchedulerConfig>>>,
}

impl MockConfigRepository {
    pub fn with_config(config: SchedulerConfig) -> Self {
        let repo = Self::default();
        repo.configs
            .lock()
            .unwrap()
            .insert(config.tenant_id.clone(), config);
        repo
    }
}

#[async_trait]
impl ConfigRepository for MockConfigRepository {
    async fn get(&self, tenant_id: &str) -> DomainResult<Option<SchedulerConfig>> {
        Ok(self.configs.lock().unwrap().get(tenant_id).cloned())
    }

    async fn upsert(&self, config: &SchedulerConfig) -> DomainResult<()> {
        self.configs
            .lock()
            .unwrap()
            .insert(config.tenant_id.clone(), config.clone());
        Ok(())
    }

    async fn mark_provider_connected(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        email: &str,
    ) -> DomainResult<()> {
        let mut configs = self.configs.lock().unwrap();
        if let Some(config) = configs.get_mut(tenant_id) {
            config.calendar_provider = provider;
            config.connected_email = Some(email.to_string());
        }
        Ok(())
    }

    async fn mark_provider_disconnected(&self, tenant_id: &str) -> DomainResult<()> {
        let mut configs = self.configs.lock().unwrap();
        if let Some(config) = configs.get_mut(tenant_id) {
            config.calendar_provider = CalendarProviderKind::None;
            config.connected_email = None;
        }
        Ok(())
    }
}

/// In-memory `BookingRepository`.
///
/// `insert` enforces the same uniqueness the production schema does: one
/// confirmed booking per (tenant, date, time).
#[derive(Default, Clone)]
pub struct MockBookingRepository {
    bookings: Arc<Mutex<Vec<Booking>>>,
    reject_inserts: bool,
}

impl MockBookingRepository {
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Arc::new(Mutex::new(bookings)),
            reject_inserts: false,
        }
    }

    /// Every insert loses the uniqueness race, as if a concurrent request
    /// took the slot between the recheck and the write.
    pub fn rejecting_inserts() -> Self {
        Self {
            reject_inserts: true,
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn insert(&self, booking: &Booking) -> DomainResult<()> {
        if self.reject_inserts {
            return Err(SlotbookError::Conflict(format!(
                "slot {} on {} is already booked",
                booking.time, booking.date
            )));
        }
        let mut bookings = self.bookings.lock().unwrap();
        let taken = bookings.iter().any(|b| {
            b.tenant_id == booking.tenant_id
                && b.date == booking.date
                && b.time == booking.time
                && b.status == BookingStatus::Confirmed
        });
        if taken && booking.status == BookingStatus::Confirmed {
            return Err(SlotbookError::Conflict(format!(
                "slot {} on {} is already booked",
                booking.time, booking.date
            )));
        }
        bookings.push(booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.tenant_id == tenant_id && b.id == id)
            .cloned())
    }

    async fn list_confirmed_for_date(
        &self,
        tenant_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                b.tenant_id == tenant_id
                    && b.date == date
                    && b.status == BookingStatus::Confirmed
            })
            .cloned()
            .collect())
    }

    async fn list_confirmed_in_range(
        &self,
        tenant_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                b.tenant_id == tenant_id
                    && b.date >= start
                    && b.date <= end
                    && b.status == BookingStatus::Confirmed
            })
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: BookingStatus,
    ) -> DomainResult<()> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings
            .iter_mut()
            .find(|b| b.tenant_id == tenant_id && b.id == id)
        {
            Some(booking) => {
                booking.status = status;
                Ok(())
            }
            None => Err(SlotbookError::NotFound(format!("booking {id}"))),
        }
    }

    async fn set_external_event_id(
        &self,
        tenant_id: &str,
        id: &str,
        event_id: Option<&str>,
    ) -> DomainResult<()> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings
            .iter_mut()
            .find(|b| b.tenant_id == tenant_id && b.id == id)
        {
            Some(booking) => {
                booking.external_event_id = event_id.map(str::to_string);
                Ok(())
            }
            None => Err(SlotbookError::NotFound(format!("booking {id}"))),
        }
    }

    async fn update(&self, updated: &Booking) -> DomainResult<()> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings
            .iter_mut()
            .find(|b| b.tenant_id == updated.tenant_id && b.id == updated.id)
        {
            Some(booking) => {
                *booking = updated.clone();
                Ok(())
            }
            None => Err(SlotbookError::NotFound(format!("booking {}", updated.id))),
        }
    }
}

/// In-memory `MeetingTypeRepository` seeded with a fixed catalogue.
#[derive(Default, Clone)]
pub struct MockMeetingTypeRepository {
    meeting_types: Arc<Vec<MeetingType>>,
}

impl MockMeetingTypeRepository {
    pub fn with_defaults() -> Self {
        Self {
            meeting_types: Arc::new(vec![
                meeting_type("Intro Call", 30, LocationType::Virtual),
                meeting_type("Phone Consultation", 15, LocationType::Phone),
                meeting_type("Deep Dive", 60, LocationType::InPerson),
            ]),
        }
    }
}

fn meeting_type(name: &str, duration: u32, location: LocationType) -> MeetingType {
    MeetingType {
        id: format!("mt-{}", name.to_lowercase().replace(' ', "-")),
        tenant_id: "t1".into(),
        name: name.into(),
        duration_minutes: duration,
        description: String::new(),
        color: "#2563eb".into(),
        location_type: location,
        location: None,
    }
}

#[async_trait]
impl MeetingTypeRepository for MockMeetingTypeRepository {
    async fn list_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<MeetingType>> {
        Ok(self
            .meeting_types
            .iter()
            .filter(|mt| mt.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> DomainResult<Option<MeetingType>> {
        Ok(self
            .meeting_types
            .iter()
            .find(|mt| mt.tenant_id == tenant_id && mt.name == name)
            .cloned())
    }
}

/// Notification sink that records every delivery, optionally failing all
/// of them.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn recorded(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: &str, booking: &Booking) -> DomainResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("{event}:{}", booking.id));
        if self.fail {
            return Err(SlotbookError::Network("sink unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn booking_created(
        &self,
        booking: &Booking,
        _config: &SchedulerConfig,
    ) -> DomainResult<()> {
        self.record("created", booking)
    }

    async fn booking_updated(
        &self,
        booking: &Booking,
        _config: &SchedulerConfig,
    ) -> DomainResult<()> {
        self.record("updated", booking)
    }

    async fn booking_cancelled(
        &self,
        booking: &Booking,
        _config: &SchedulerConfig,
    ) -> DomainResult<()> {
        self.record("cancelled", booking)
    }
}
