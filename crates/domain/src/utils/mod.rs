//! Domain utility functions.

pub mod time;
pub mod timezone;
