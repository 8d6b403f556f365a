//! Post-commit notification sinks.

pub mod email;
pub mod webhook;

pub use email::{EmailSender, EmailSettings};
pub use webhook::{WebhookSender, WebhookSettings};
