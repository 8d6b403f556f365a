//! Booking coordination: repository ports, request validation, and the
//! transaction coordinator.

pub mod ports;
pub mod service;
pub mod validate;
