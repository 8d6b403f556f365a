//! Per-tenant scheduler configuration.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_END_HOUR, DEFAULT_START_HOUR, DEFAULT_TIMEZONE};
use crate::errors::{Result, SlotbookError};
use crate::types::calendar::CalendarProviderKind;

/// Working hours for a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub enabled: bool,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl DayHours {
    pub fn disabled() -> Self {
        Self { enabled: false, start_hour: DEFAULT_START_HOUR, end_hour: DEFAULT_END_HOUR }
    }
}

/// Per-weekday override table. Weekends default to disabled, matching the
/// global-hours fallback behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAvailability {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl WeeklyAvailability {
    /// Uniform weekday hours, weekend disabled.
    pub fn weekdays(start_hour: u8, end_hour: u8) -> Self {
        let open = DayHours { enabled: true, start_hour, end_hour };
        Self {
            monday: open,
            tuesday: open,
            wednesday: open,
            thursday: open,
            friday: open,
            saturday: DayHours::disabled(),
            sunday: DayHours::disabled(),
        }
    }

    pub fn for_weekday(&self, weekday: Weekday) -> DayHours {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Working-hours policy and calendar connection state for one tenant.
///
/// Mutated only by the tenant's admin; read on every availability request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    pub tenant_id: String,
    pub business_name: String,
    /// Global hours, used when `weekly_availability` is absent.
    pub start_hour: u8,
    pub end_hour: u8,
    pub weekly_availability: Option<WeeklyAvailability>,
    /// IANA timezone identifier, e.g. `"America/New_York"`.
    pub timezone: String,
    pub calendar_provider: CalendarProviderKind,
    /// Email of the connected provider account, for admin display.
    pub connected_email: Option<String>,
    /// Where booking notifications for the tenant admin go. Unset disables
    /// admin emails.
    #[serde(default)]
    pub notify_email: Option<String>,
}

impl SchedulerConfig {
    /// Defaults for a tenant that has never saved configuration.
    pub fn defaults(tenant_id: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            business_name: business_name.into(),
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            weekly_availability: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            calendar_provider: CalendarProviderKind::None,
            connected_email: None,
            notify_email: None,
        }
    }

    /// Effective hours for a weekday. Without a per-day table, weekends are
    /// closed and the global hours apply Monday through Friday.
    pub fn hours_for(&self, weekday: Weekday) -> DayHours {
        match &self.weekly_availability {
            Some(weekly) => weekly.for_weekday(weekday),
            None => {
                let enabled = !matches!(weekday, Weekday::Sat | Weekday::Sun);
                DayHours { enabled, start_hour: self.start_hour, end_hour: self.end_hour }
            }
        }
    }

    /// Enforce `start_hour < end_hour` for the global hours and every
    /// enabled day of the override table.
    pub fn validate(&self) -> Result<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(SlotbookError::Validation(format!(
                "invalid working hours: {}-{}",
                self.start_hour, self.end_hour
            )));
        }

        if let Some(weekly) = &self.weekly_availability {
            for (name, day) in [
                ("monday", weekly.monday),
                ("tuesday", weekly.tuesday),
                ("wednesday", weekly.wednesday),
                ("thursday", weekly.thursday),
                ("friday", weekly.friday),
                ("saturday", weekly.saturday),
                ("sunday", weekly.sunday),
            ] {
                if day.enabled && (day.start_hour >= day.end_hour || day.end_hour > 24) {
                    return Err(SlotbookError::Validation(format!(
                        "invalid working hours for {name}: {}-{}",
                        day.start_hour, day.end_hour
                    )));
                }
            }
        }

        Ok(())
    }
}
