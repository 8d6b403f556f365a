//! Calendar provider types shared between core ports and infra adapters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SlotbookError;
use crate::utils::time::TimeOfDay;

/// Which external calendar a tenant has connected, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarProviderKind {
    Outlook,
    Google,
    None,
}

impl CalendarProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outlook => "outlook",
            Self::Google => "google",
            Self::None => "none",
        }
    }

    /// Whether external calendar lookups apply at all.
    pub fn is_connected_kind(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for CalendarProviderKind {
    type Err = SlotbookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "outlook" => Ok(Self::Outlook),
            "google" => Ok(Self::Google),
            "none" => Ok(Self::None),
            other => {
                Err(SlotbookError::Validation(format!("unknown calendar provider: '{other}'")))
            }
        }
    }
}

impl fmt::Display for CalendarProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time range an external calendar reports as occupied.
///
/// Ephemeral: recomputed on every availability request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Everything a provider needs to create a calendar event for a booking.
///
/// Times are tenant-local wall clock; the provider adapter attaches the
/// timezone when shaping its request body.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub subject: String,
    pub body_html: String,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub duration_minutes: u32,
    /// IANA timezone the wall-clock times are expressed in.
    pub timezone: String,
    pub attendee_email: String,
    pub attendee_name: String,
    pub location: Option<String>,
    /// Request an online-meeting link where the provider supports one.
    pub online_meeting: bool,
}

/// Partial update for an already-created external event.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub subject: Option<String>,
    pub date: Option<NaiveDate>,
    pub start: Option<TimeOfDay>,
    pub duration_minutes: Option<u32>,
    /// IANA timezone the new start is expressed in. Required whenever the
    /// schedule fields are set.
    pub timezone: Option<String>,
}

/// Connected-account profile, used for display after an OAuth connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub email: String,
    pub name: Option<String>,
}

/// A candidate bookable start time offered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub time: TimeOfDay,
    /// 12-hour label, e.g. `"2:30 PM"`.
    pub display: String,
}

impl Slot {
    pub fn new(time: TimeOfDay) -> Self {
        Self { display: time.display_12h(), time }
    }
}
