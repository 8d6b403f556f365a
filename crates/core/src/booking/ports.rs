//! Repository ports implemented by the infra crate.

use async_trait::async_trait;
use chrono::NaiveDate;
use slotbook_domain::{
    Booking, BookingStatus, CalendarProviderKind, MeetingType, OAuthCredential, Result,
    SchedulerConfig, Tenant,
};

/// Tenant directory lookups.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>>;

    async fn list(&self) -> Result<Vec<Tenant>>;
}

/// Per-tenant scheduler configuration.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn get(&self, tenant_id: &str) -> Result<Option<SchedulerConfig>>;

    async fn upsert(&self, config: &SchedulerConfig) -> Result<()>;

    /// Record a freshly connected provider (and its account email),
    /// clearing any previously connected one.
    async fn mark_provider_connected(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        email: &str,
    ) -> Result<()>;

    /// Clear the connected provider and email.
    async fn mark_provider_disconnected(&self, tenant_id: &str) -> Result<()>;
}

/// Meeting type catalogue.
#[async_trait]
pub trait MeetingTypeRepository: Send + Sync {
    async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<MeetingType>>;

    async fn find_by_name(&self, tenant_id: &str, name: &str) -> Result<Option<MeetingType>>;
}

/// Booking persistence.
///
/// `insert` is the last line of defence against the check-then-act race:
/// two concurrent confirmations of the same (tenant, date, time) must make
/// exactly one row, the loser receiving `SlotbookError::Conflict`.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<()>;

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Booking>>;

    /// Confirmed bookings for one tenant-local date.
    async fn list_confirmed_for_date(&self, tenant_id: &str, date: NaiveDate)
        -> Result<Vec<Booking>>;

    /// Confirmed bookings over an inclusive date range.
    async fn list_confirmed_in_range(
        &self,
        tenant_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Booking>>;

    async fn set_status(&self, tenant_id: &str, id: &str, status: BookingStatus) -> Result<()>;

    async fn set_external_event_id(
        &self,
        tenant_id: &str,
        id: &str,
        event_id: Option<&str>,
    ) -> Result<()>;

    /// Rewrite the schedule fields of an existing booking (reschedule).
    async fn update(&self, booking: &Booking) -> Result<()>;
}

/// OAuth credential persistence, keyed by (tenant, provider).
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn store(&self, credential: &OAuthCredential) -> Result<()>;

    async fn load(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<Option<OAuthCredential>>;

    async fn delete(&self, tenant_id: &str, provider: CalendarProviderKind) -> Result<()>;
}
