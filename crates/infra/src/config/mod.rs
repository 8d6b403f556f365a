//! Application configuration.

mod loader;

pub use loader::{load, load_from_env, load_from_file};

use serde::Deserialize;

fn default_pool_size() -> u32 {
    8
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    slotbook_domain::constants::PROVIDER_TIMEOUT_SECS
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub server: ServerSettings,
    /// OAuth app credentials; a missing section leaves that provider
    /// unconfigured and tenants cannot connect it.
    #[serde(default)]
    pub google: Option<OAuthAppSettings>,
    #[serde(default)]
    pub outlook: Option<OAuthAppSettings>,
    #[serde(default)]
    pub email: Option<EmailApiSettings>,
    #[serde(default)]
    pub webhook: Option<WebhookApiSettings>,
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Static bearer token guarding admin routes; unset locks them out.
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind_addr: default_bind_addr(), admin_token: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthAppSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailApiSettings {
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookApiSettings {
    pub url: String,
    pub secret: String,
}
