//! Tenant identity.

use serde::{Deserialize, Serialize};

/// An independent business account with its own booking page, config, and
/// calendar connection. Every credential, config, and booking lookup in the
/// system is keyed by `id`; there is no single-tenant mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    /// URL-safe handle used in public booking-page paths.
    pub slug: String,
    pub display_name: String,
    /// Admin contact address; receives booking notifications.
    pub email: String,
}
