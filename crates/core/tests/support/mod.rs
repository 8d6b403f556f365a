//! Shared test helpers for `slotbook-core` integration tests.
//!
//! In-memory port implementations so booking and availability tests can
//! focus on behaviour instead of wiring.

pub mod calendar;
pub mod repositories;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use slotbook_domain::{Booking, BookingStatus, LocationType, SchedulerConfig, Tenant};

pub fn tenant() -> Tenant {
    Tenant {
        id: "t1".into(),
        slug: "acme".into(),
        display_name: "Acme Consulting".into(),
        email: "owner@acme.test".into(),
    }
}

pub fn config() -> SchedulerConfig {
    SchedulerConfig::defaults("t1", "Acme Consulting")
}

/// A Tuesday, comfortably in the future relative to [`clock`].
pub fn target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 24).unwrap()
}

/// Fixed clock: Friday 2025-06-20 12:00 UTC.
pub fn clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap()
}

pub fn booking_at(time: &str, duration: u32) -> Booking {
    Booking {
        id: format!("bk-{time}"),
        tenant_id: "t1".into(),
        date: target_date(),
        time: time.parse().unwrap(),
        duration_minutes: duration,
        meeting_type: "Intro Call".into(),
        client_name: "Pat Doe".into(),
        client_email: "pat@example.com".into(),
        client_phone: None,
        notes: None,
        location_type: Some(LocationType::Virtual),
        location: None,
        external_event_id: None,
        status: BookingStatus::Confirmed,
        created_at: clock(),
    }
}
