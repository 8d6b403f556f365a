//! Candidate slot generation.
//!
//! Pure and stateless: identical inputs yield an identical, order-stable
//! sequence. No I/O happens here; the only failure mode is malformed input.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use slotbook_domain::constants::{MEETING_DURATIONS, SAME_DAY_LEAD_MINUTES};
use slotbook_domain::{
    parse_timezone, DayHours, Result, SchedulerConfig, SlotbookError, TimeOfDay,
};

/// Validate a requested meeting duration against the offered set.
pub fn validate_duration(duration_minutes: u32) -> Result<()> {
    if MEETING_DURATIONS.contains(&duration_minutes) {
        return Ok(());
    }
    Err(SlotbookError::Validation(format!(
        "unsupported meeting duration: {duration_minutes} minutes"
    )))
}

/// Generate every start time within the working window.
///
/// Starts step by the meeting duration from the top of each hour; a start is
/// kept only when the full meeting fits before the end hour.
pub fn generate_slots(hours: DayHours, duration_minutes: u32) -> Result<Vec<TimeOfDay>> {
    validate_duration(duration_minutes)?;

    if !hours.enabled {
        return Ok(Vec::new());
    }

    let end_minutes = u32::from(hours.end_hour) * 60;
    let mut slots = Vec::new();

    for hour in hours.start_hour..hours.end_hour {
        for minute in (0..60).step_by(duration_minutes as usize) {
            let start = u32::from(hour) * 60 + minute;
            if start + duration_minutes > end_minutes {
                continue;
            }
            slots.push(TimeOfDay::from_minutes(start)?);
        }
    }

    Ok(slots)
}

/// Candidate slots for a tenant on a target date.
///
/// Past dates and disabled weekdays yield an empty sequence. When the target
/// date is today in the tenant's timezone, starts at or before
/// `now + SAME_DAY_LEAD_MINUTES` are dropped.
pub fn candidate_slots(
    config: &SchedulerConfig,
    date: NaiveDate,
    duration_minutes: u32,
    now: DateTime<Utc>,
) -> Result<Vec<TimeOfDay>> {
    let tz = parse_timezone(&config.timezone)?;
    let now_local = now.with_timezone(&tz);
    let today = now_local.date_naive();

    if date < today {
        return Ok(Vec::new());
    }

    let hours = config.hours_for(date.weekday());
    let mut slots = generate_slots(hours, duration_minutes)?;

    if date == today {
        let cutoff = i64::from(now_local.hour() * 60 + now_local.minute()) + SAME_DAY_LEAD_MINUTES;
        slots.retain(|slot| i64::from(slot.minutes()) > cutoff);
    }

    Ok(slots)
}
