//! Domain constants shared across crates.

/// Minutes in a day; busy intervals are clamped to `[0, MINUTES_PER_DAY)`.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Bookings on the current day must start at least this far in the future.
pub const SAME_DAY_LEAD_MINUTES: i64 = 30;

/// Access tokens within this buffer of expiry are refreshed before use.
pub const TOKEN_REFRESH_BUFFER_SECS: i64 = 300;

/// Hard timeout applied to every external provider call. A timeout is
/// treated identically to "provider unreachable".
pub const PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Meeting durations offered to clients, in minutes.
pub const MEETING_DURATIONS: [u32; 3] = [15, 30, 60];

/// Fallback working hours when a tenant has no stored configuration.
pub const DEFAULT_START_HOUR: u8 = 9;
/// See [`DEFAULT_START_HOUR`].
pub const DEFAULT_END_HOUR: u8 = 17;

/// Fallback IANA timezone for tenants without an explicit setting.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
