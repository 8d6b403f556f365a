//! Conflict resolution between candidate slots, internal bookings, and
//! externally reported busy intervals.

use chrono::NaiveDate;
use chrono_tz::Tz;
use slotbook_domain::{busy_window_local, Booking, BookingStatus, BusyInterval, TimeOfDay};

/// Half-open interval overlap test on minutes since midnight.
pub fn overlaps(s1: i64, e1: i64, s2: i64, e2: i64) -> bool {
    s1 < e2 && e1 > s2
}

/// Project provider busy intervals onto tenant-local minutes for `date`.
///
/// Providers report UTC instants; everything else in the resolver works on
/// local minutes, so the conversion happens once, here.
pub fn busy_windows_for_date(busy: &[BusyInterval], tz: Tz, date: NaiveDate) -> Vec<(i32, i32)> {
    busy.iter()
        .filter_map(|interval| busy_window_local(interval.start, interval.end, tz, date))
        .collect()
}

/// Remove candidates that overlap a confirmed booking or a busy window.
///
/// Cancelled bookings never occupy a slot; they are skipped even if present
/// in the input.
pub fn filter_conflicts(
    candidates: Vec<TimeOfDay>,
    duration_minutes: u32,
    bookings: &[Booking],
    busy_windows: &[(i32, i32)],
) -> Vec<TimeOfDay> {
    candidates
        .into_iter()
        .filter(|slot| !conflicts(*slot, duration_minutes, bookings, busy_windows))
        .collect()
}

/// Whether one candidate start collides with any booking or busy window.
pub fn conflicts(
    slot: TimeOfDay,
    duration_minutes: u32,
    bookings: &[Booking],
    busy_windows: &[(i32, i32)],
) -> bool {
    let start = i64::from(slot.minutes());
    let end = start + i64::from(duration_minutes);

    let booked = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .any(|b| overlaps(start, end, i64::from(b.start_minutes()), i64::from(b.end_minutes())));

    if booked {
        return true;
    }

    busy_windows.iter().any(|&(from, to)| overlaps(start, end, i64::from(from), i64::from(to)))
}
