//! Booking records and submission payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::meeting::LocationType;
use crate::utils::time::TimeOfDay;

/// Lifecycle of a booking. Cancelled bookings never occupy a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A confirmed (or later cancelled) reservation of one slot.
///
/// Immutable once confirmed apart from the status transition to cancelled
/// and the best-effort external event id backfill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub tenant_id: String,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub duration_minutes: u32,
    pub meeting_type: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub notes: Option<String>,
    pub location_type: Option<LocationType>,
    pub location: Option<String>,
    /// Identifier of the mirrored event in the tenant's external calendar,
    /// when one was created.
    pub external_event_id: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Start of the occupied interval in minutes since midnight.
    pub fn start_minutes(&self) -> u32 {
        self.time.minutes()
    }

    /// End of the occupied interval (exclusive) in minutes since midnight.
    pub fn end_minutes(&self) -> u32 {
        self.time.minutes() + self.duration_minutes
    }
}

/// Client-submitted booking request, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub duration_minutes: u32,
    pub meeting_type: String,
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub location: Option<String>,
}
