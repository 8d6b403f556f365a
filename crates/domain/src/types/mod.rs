//! Domain data types.

pub mod booking;
pub mod calendar;
pub mod config;
pub mod credential;
pub mod meeting;
pub mod tenant;

pub use booking::*;
pub use calendar::*;
pub use config::*;
pub use credential::*;
pub use meeting::*;
pub use tenant::*;
