//! IANA to Windows timezone name mapping for Microsoft Graph.
//!
//! Graph time-range queries and event bodies expect Windows timezone names.
//! Unmapped zones pass the IANA string through unchanged; Graph accepts
//! IANA names for most tenants, so this degrades rather than fails.

/// Windows timezone name for an IANA identifier, or the input itself when
/// no mapping is known.
pub fn windows_timezone(iana: &str) -> &str {
    match iana {
        "America/New_York" => "Eastern Standard Time",
        "America/Detroit" => "Eastern Standard Time",
        "America/Toronto" => "Eastern Standard Time",
        "America/Chicago" => "Central Standard Time",
        "America/Winnipeg" => "Central Standard Time",
        "America/Denver" => "Mountain Standard Time",
        "America/Edmonton" => "Mountain Standard Time",
        "America/Phoenix" => "US Mountain Standard Time",
        "America/Los_Angeles" => "Pacific Standard Time",
        "America/Vancouver" => "Pacific Standard Time",
        "America/Anchorage" => "Alaskan Standard Time",
        "Pacific/Honolulu" => "Hawaiian Standard Time",
        "America/Halifax" => "Atlantic Standard Time",
        "America/Sao_Paulo" => "E. South America Standard Time",
        "America/Mexico_City" => "Central Standard Time (Mexico)",
        "America/Bogota" => "SA Pacific Standard Time",
        "America/Argentina/Buenos_Aires" => "Argentina Standard Time",
        "UTC" => "UTC",
        "Etc/UTC" => "UTC",
        "Europe/London" => "GMT Standard Time",
        "Europe/Dublin" => "GMT Standard Time",
        "Europe/Lisbon" => "GMT Standard Time",
        "Europe/Paris" => "Romance Standard Time",
        "Europe/Brussels" => "Romance Standard Time",
        "Europe/Madrid" => "Romance Standard Time",
        "Europe/Berlin" => "W. Europe Standard Time",
        "Europe/Amsterdam" => "W. Europe Standard Time",
        "Europe/Rome" => "W. Europe Standard Time",
        "Europe/Stockholm" => "W. Europe Standard Time",
        "Europe/Vienna" => "W. Europe Standard Time",
        "Europe/Zurich" => "W. Europe Standard Time",
        "Europe/Warsaw" => "Central European Standard Time",
        "Europe/Prague" => "Central Europe Standard Time",
        "Europe/Athens" => "GTB Standard Time",
        "Europe/Bucharest" => "GTB Standard Time",
        "Europe/Helsinki" => "FLE Standard Time",
        "Europe/Kyiv" => "FLE Standard Time",
        "Europe/Istanbul" => "Turkey Standard Time",
        "Europe/Moscow" => "Russian Standard Time",
        "Africa/Cairo" => "Egypt Standard Time",
        "Africa/Johannesburg" => "South Africa Standard Time",
        "Africa/Lagos" => "W. Central Africa Standard Time",
        "Africa/Nairobi" => "E. Africa Standard Time",
        "Asia/Jerusalem" => "Israel Standard Time",
        "Asia/Dubai" => "Arabian Standard Time",
        "Asia/Riyadh" => "Arab Standard Time",
        "Asia/Karachi" => "Pakistan Standard Time",
        "Asia/Kolkata" => "India Standard Time",
        "Asia/Dhaka" => "Bangladesh Standard Time",
        "Asia/Bangkok" => "SE Asia Standard Time",
        "Asia/Jakarta" => "SE Asia Standard Time",
        "Asia/Singapore" => "Singapore Standard Time",
        "Asia/Kuala_Lumpur" => "Singapore Standard Time",
        "Asia/Hong_Kong" => "China Standard Time",
        "Asia/Shanghai" => "China Standard Time",
        "Asia/Taipei" => "Taipei Standard Time",
        "Asia/Manila" => "Singapore Standard Time",
        "Asia/Seoul" => "Korea Standard Time",
        "Asia/Tokyo" => "Tokyo Standard Time",
        "Australia/Perth" => "W. Australia Standard Time",
        "Australia/Adelaide" => "Cen. Australia Standard Time",
        "Australia/Brisbane" => "E. Australia Standard Time",
        "Australia/Sydney" => "AUS Eastern Standard Time",
        "Australia/Melbourne" => "AUS Eastern Standard Time",
        "Pacific/Auckland" => "New Zealand Standard Time",
        other => other,
    }
}
