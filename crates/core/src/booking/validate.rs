//! Booking request validation. Runs before any side effect.

use once_cell::sync::Lazy;
use regex::Regex;
use slotbook_domain::{BookingRequest, LocationType, MeetingType, Result, SlotbookError};

use crate::scheduling::slots::validate_duration;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validate a client-submitted booking request against its meeting type.
///
/// Returns `Validation` on the first problem found; a request that passes
/// is safe to recheck and persist.
pub fn validate_request(request: &BookingRequest, meeting_type: &MeetingType) -> Result<()> {
    if request.client_name.trim().is_empty() {
        return Err(SlotbookError::Validation("client name is required".into()));
    }
    if request.client_email.trim().is_empty() {
        return Err(SlotbookError::Validation("client email is required".into()));
    }
    if !EMAIL_RE.is_match(request.client_email.trim()) {
        return Err(SlotbookError::Validation(format!(
            "invalid email address: {}",
            request.client_email
        )));
    }
    if request.meeting_type.trim().is_empty() {
        return Err(SlotbookError::Validation("meeting type is required".into()));
    }

    validate_duration(request.duration_minutes)?;

    let location = request.location_type.unwrap_or(meeting_type.location_type);
    if location == LocationType::Phone
        && request.client_phone.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        return Err(SlotbookError::Validation(
            "phone number is required for phone meetings".into(),
        ));
    }

    Ok(())
}
