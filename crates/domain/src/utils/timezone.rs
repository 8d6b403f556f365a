//! Timezone conversion for externally reported busy intervals.
//!
//! Providers report busy intervals as UTC instants while slot arithmetic
//! runs on tenant-local minutes since midnight. A conversion mistake here
//! silently leaks or hides slots, so the projection lives in one place and
//! is tested on its own.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::constants::MINUTES_PER_DAY;
use crate::errors::{Result, SlotbookError};

/// Parse an IANA timezone identifier.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SlotbookError::Validation(format!("unknown timezone: '{name}'")))
}

/// Project a UTC busy interval onto `date` in the tenant's timezone.
///
/// Returns the interval as local minutes since midnight, clamped to the day:
/// a busy period starting the previous evening clamps to 0, one running past
/// midnight clamps to `MINUTES_PER_DAY`. Returns `None` when the interval
/// does not touch `date` at all, or is empty after clamping.
pub fn busy_window_local(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
    date: NaiveDate,
) -> Option<(i32, i32)> {
    let start_local = start.with_timezone(&tz);
    let end_local = end.with_timezone(&tz);

    if start_local.date_naive() > date || end_local.date_naive() < date {
        return None;
    }

    let minutes_of = |dt: &DateTime<Tz>| {
        use chrono::Timelike;
        (dt.hour() * 60 + dt.minute()) as i32
    };

    let from = if start_local.date_naive() < date { 0 } else { minutes_of(&start_local) };
    let to = if end_local.date_naive() > date { MINUTES_PER_DAY } else { minutes_of(&end_local) };

    if to <= from {
        return None;
    }

    Some((from, to))
}
