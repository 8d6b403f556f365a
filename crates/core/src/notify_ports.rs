//! Notification port.
//!
//! Sinks run post-commit and are best-effort: the coordinator wraps every
//! call in its own failure boundary, so an implementation may fail freely
//! without affecting the booking or its sibling sinks.

use async_trait::async_trait;
use slotbook_domain::{Booking, Result, SchedulerConfig};

/// A post-commit side effect of a booking state change (email, webhook,
/// admin notification).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Name used in logs when the sink fails.
    fn name(&self) -> &'static str;

    async fn booking_created(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()>;

    async fn booking_updated(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()>;

    async fn booking_cancelled(&self, booking: &Booking, config: &SchedulerConfig) -> Result<()>;
}
