//! # Slotbook Infrastructure
//!
//! Adapters behind the core ports: SQLite persistence, the calendar
//! provider clients and token vault, the OAuth connect flow, notification
//! senders, and configuration loading.

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod notifications;

pub use config::AppConfig;
pub use database::DbManager;
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::calendar::{
    OAuthFlow, ProviderCalendarGateway, ProviderRegistry, TokenVault,
};
