//! # Slotbook Core
//!
//! Business logic for availability computation and booking coordination.
//!
//! This crate contains:
//! - The slot generator and conflict resolver (pure functions)
//! - The availability service and booking transaction coordinator
//! - Port traits implemented by `slotbook-infra` (repositories, the
//!   calendar gateway, notification sinks)
//!
//! ## Architecture
//! - Depends only on `slotbook-domain` and external crates
//! - No I/O of its own; everything observable goes through ports

pub mod booking;
pub mod calendar_ports;
pub mod notify_ports;
pub mod scheduling;

pub use booking::ports::{
    BookingRepository, ConfigRepository, CredentialRepository, MeetingTypeRepository,
    TenantRepository,
};
pub use booking::service::{BookingCoordinator, BookingUpdate};
pub use calendar_ports::{BusyQuery, CalendarGateway};
pub use notify_ports::NotificationSink;
pub use scheduling::service::AvailabilityService;
