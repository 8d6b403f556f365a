//! Meeting type catalogue entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SlotbookError;

/// Where a meeting takes place; drives conditional validation (phone
/// meetings require a client phone number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    InPerson,
    Phone,
    Virtual,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPerson => "in_person",
            Self::Phone => "phone",
            Self::Virtual => "virtual",
        }
    }
}

impl FromStr for LocationType {
    type Err = SlotbookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "in_person" => Ok(Self::InPerson),
            "phone" => Ok(Self::Phone),
            "virtual" => Ok(Self::Virtual),
            other => Err(SlotbookError::Validation(format!("unknown location type: '{other}'"))),
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable meeting kind a tenant offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingType {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// One of 15, 30, or 60 minutes.
    pub duration_minutes: u32,
    pub description: String,
    pub color: String,
    pub location_type: LocationType,
    /// Physical address for in-person meetings, join link for virtual ones.
    pub location: Option<String>,
}
