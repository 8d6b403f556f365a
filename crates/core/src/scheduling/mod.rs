//! Slot generation, conflict resolution, and the availability service.

pub mod conflicts;
pub mod service;
pub mod slots;
