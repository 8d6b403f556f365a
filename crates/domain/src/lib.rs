//! # Slotbook Domain
//!
//! Business domain types and models for Slotbook.
//!
//! This crate contains:
//! - Domain data types (Tenant, SchedulerConfig, Booking, etc.)
//! - Domain error types and Result definitions
//! - Domain constants
//! - Time-of-day and timezone conversion utilities
//!
//! ## Architecture
//! - No dependencies on other Slotbook crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
// Re-export time utilities used across every crate
pub use utils::time::TimeOfDay;
pub use utils::timezone::{busy_window_local, parse_timezone};
