//! Configuration loader.
//!
//! ## Loading strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variables are missing, falls back to a TOML file
//! 3. Probes standard paths for the file
//!
//! ## Environment variables
//! - `SLOTBOOK_DB_PATH`: database file path (required)
//! - `SLOTBOOK_DB_POOL_SIZE`: connection pool size
//! - `SLOTBOOK_BIND_ADDR`: HTTP listen address
//! - `SLOTBOOK_ADMIN_TOKEN`: bearer token for admin routes
//! - `SLOTBOOK_GOOGLE_CLIENT_ID` / `_CLIENT_SECRET` / `_REDIRECT_URI`
//! - `SLOTBOOK_OUTLOOK_CLIENT_ID` / `_CLIENT_SECRET` / `_REDIRECT_URI`
//! - `SLOTBOOK_EMAIL_API_KEY` / `SLOTBOOK_EMAIL_FROM`
//! - `SLOTBOOK_WEBHOOK_URL` / `SLOTBOOK_WEBHOOK_SECRET`
//! - `SLOTBOOK_PROVIDER_TIMEOUT_SECS`: external call timeout
//!
//! ## File locations
//! `./slotbook.toml`, `./config.toml`, then the same names one directory up.

use std::path::{Path, PathBuf};

use slotbook_domain::{Result, SlotbookError};

use super::{
    AppConfig, DatabaseSettings, EmailApiSettings, OAuthAppSettings, ServerSettings,
    WebhookApiSettings,
};

/// Load configuration with automatic fallback strategy.
pub fn load() -> Result<AppConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment configuration incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `SLOTBOOK_*` environment variables.
pub fn load_from_env() -> Result<AppConfig> {
    let database = DatabaseSettings {
        path: env_var("SLOTBOOK_DB_PATH")?,
        pool_size: env_parsed("SLOTBOOK_DB_POOL_SIZE")?.unwrap_or_else(super::default_pool_size),
    };

    let server = ServerSettings {
        bind_addr: std::env::var("SLOTBOOK_BIND_ADDR")
            .unwrap_or_else(|_| super::default_bind_addr()),
        admin_token: std::env::var("SLOTBOOK_ADMIN_TOKEN").ok(),
    };

    Ok(AppConfig {
        database,
        server,
        google: oauth_settings("SLOTBOOK_GOOGLE")?,
        outlook: oauth_settings("SLOTBOOK_OUTLOOK")?,
        email: email_settings()?,
        webhook: webhook_settings()?,
        provider_timeout_secs: env_parsed("SLOTBOOK_PROVIDER_TIMEOUT_SECS")?
            .unwrap_or_else(super::default_provider_timeout_secs),
    })
}

/// Load configuration from a TOML file, probing standard locations when no
/// path is given.
pub fn load_from_file(path: Option<&Path>) -> Result<AppConfig> {
    let path = match path {
        Some(path) => {
            if !path.exists() {
                return Err(SlotbookError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => probe_config_paths().ok_or_else(|| {
            SlotbookError::Config(
                "no configuration found: set SLOTBOOK_DB_PATH or provide slotbook.toml".into(),
            )
        })?,
    };

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| SlotbookError::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: AppConfig = toml::from_str(&contents)
        .map_err(|e| SlotbookError::Config(format!("invalid config {}: {e}", path.display())))?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    const CANDIDATES: [&str; 4] =
        ["slotbook.toml", "config.toml", "../slotbook.toml", "../config.toml"];

    CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| SlotbookError::Config(format!("missing environment variable: {name}")))
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| SlotbookError::Config(format!("invalid value for {name}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// All three variables or none; a partial set is treated as a mistake.
fn oauth_settings(prefix: &str) -> Result<Option<OAuthAppSettings>> {
    let client_id = std::env::var(format!("{prefix}_CLIENT_ID")).ok();
    let client_secret = std::env::var(format!("{prefix}_CLIENT_SECRET")).ok();
    let redirect_uri = std::env::var(format!("{prefix}_REDIRECT_URI")).ok();

    match (client_id, client_secret, redirect_uri) {
        (Some(client_id), Some(client_secret), Some(redirect_uri)) => {
            Ok(Some(OAuthAppSettings { client_id, client_secret, redirect_uri }))
        }
        (None, None, None) => Ok(None),
        _ => Err(SlotbookError::Config(format!(
            "incomplete oauth settings: set all of {prefix}_CLIENT_ID, {prefix}_CLIENT_SECRET, \
             {prefix}_REDIRECT_URI or none"
        ))),
    }
}

fn email_settings() -> Result<Option<EmailApiSettings>> {
    let api_key = std::env::var("SLOTBOOK_EMAIL_API_KEY").ok();
    let from = std::env::var("SLOTBOOK_EMAIL_FROM").ok();

    match (api_key, from) {
        (Some(api_key), Some(from)) => Ok(Some(EmailApiSettings { api_key, from })),
        (None, None) => Ok(None),
        _ => Err(SlotbookError::Config(
            "incomplete email settings: set both SLOTBOOK_EMAIL_API_KEY and SLOTBOOK_EMAIL_FROM"
                .into(),
        )),
    }
}

fn webhook_settings() -> Result<Option<WebhookApiSettings>> {
    let url = std::env::var("SLOTBOOK_WEBHOOK_URL").ok();
    let secret = std::env::var("SLOTBOOK_WEBHOOK_SECRET").ok();

    match (url, secret) {
        (Some(url), Some(secret)) => Ok(Some(WebhookApiSettings { url, secret })),
        (None, None) => Ok(None),
        _ => Err(SlotbookError::Config(
            "incomplete webhook settings: set both SLOTBOOK_WEBHOOK_URL and \
             SLOTBOOK_WEBHOOK_SECRET"
                .into(),
        )),
    }
}
