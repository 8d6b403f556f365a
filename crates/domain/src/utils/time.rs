//! Time-of-day representation used by slots and bookings.
//!
//! All conflict arithmetic happens on minutes since midnight; the wire format
//! is always a zero-padded `"HH:MM"` string.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::SlotbookError;

/// A wall-clock time within a single day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from minutes since midnight. Values of 24:00 or later are
    /// rejected; slot ends past midnight never occur in this domain.
    pub fn from_minutes(minutes: u32) -> Result<Self, SlotbookError> {
        if minutes >= 24 * 60 {
            return Err(SlotbookError::Validation(format!(
                "time of day out of range: {minutes} minutes"
            )));
        }
        Ok(Self(minutes as u16))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// 12-hour display label, e.g. `"2:30 PM"` or `"12:00 AM"`.
    pub fn display_12h(self) -> String {
        let hour = self.hour();
        let period = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour {
            0 => 12,
            1..=12 => hour,
            _ => hour - 12,
        };
        format!("{}:{:02} {}", display_hour, self.minute(), period)
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotbookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SlotbookError::Validation(format!("invalid time of day: '{value}'"));

        let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

        if hours >= 24 || minutes >= 60 {
            return Err(invalid());
        }

        Self::from_minutes(hours * 60 + minutes)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: SlotbookError| D::Error::custom(e.to_string()))
    }
}
