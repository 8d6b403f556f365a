//! OAuth credentials stored per (tenant, provider).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TOKEN_REFRESH_BUFFER_SECS;
use crate::types::calendar::CalendarProviderKind;

/// Stored OAuth grant for one tenant and one provider.
///
/// Exactly one row per (tenant, provider); updated in place on refresh,
/// deleted on disconnect or terminal refresh failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCredential {
    pub tenant_id: String,
    pub provider: CalendarProviderKind,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub scope: String,
}

impl OAuthCredential {
    /// Whether the access token is still usable without a refresh.
    ///
    /// Tokens inside the refresh buffer are treated as expired so callers
    /// never hand out a token about to lapse mid-request.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + Duration::seconds(TOKEN_REFRESH_BUFFER_SECS)
    }
}
