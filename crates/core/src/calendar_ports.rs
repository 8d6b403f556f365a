//! Calendar gateway port.
//!
//! The boundary between booking logic and external calendar services. The
//! infra implementation resolves tokens through the token vault and speaks
//! each provider's wire protocol; core code only sees this capability set.

use async_trait::async_trait;
use chrono::NaiveDate;
use slotbook_domain::{
    BusyInterval, CalendarProviderKind, EventDraft, EventPatch, ProviderProfile, Result,
};

/// Free/busy query window for one tenant-local day.
#[derive(Debug, Clone)]
pub struct BusyQuery {
    pub date: NaiveDate,
    /// Working window bounds; providers are only asked about these hours.
    pub start_hour: u8,
    pub end_hour: u8,
    /// Tenant's IANA timezone the hour bounds are expressed in.
    pub timezone: String,
}

/// Trait for external calendar operations.
///
/// Every operation is a no-op signalling "not connected" (empty vec, `None`,
/// or `false`) when the tenant has no usable credential — calendar sync is
/// optional and the booking flow must work with the provider fully
/// unreachable or never connected. Genuine provider failures surface as
/// `SlotbookError::Provider` for the caller's degrade paths.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Fetch busy intervals (as UTC instants) for the query window.
    async fn fetch_busy_intervals(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        query: &BusyQuery,
    ) -> Result<Vec<BusyInterval>>;

    /// Create an event in the tenant's primary calendar. Returns the
    /// external event id, or `None` when not connected.
    async fn create_event(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        draft: &EventDraft,
    ) -> Result<Option<String>>;

    /// Patch an existing external event. Returns `false` when not connected.
    async fn update_event(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<bool>;

    /// Delete an external event. Returns `false` when not connected; an
    /// already-gone event counts as deleted.
    async fn delete_event(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        event_id: &str,
    ) -> Result<bool>;

    /// Fetch the connected account's profile, or `None` when not connected.
    async fn fetch_profile(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<Option<ProviderProfile>>;

    /// Whether a usable credential exists for (tenant, provider).
    async fn is_connected(&self, tenant_id: &str, provider: CalendarProviderKind) -> Result<bool>;
}
