//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slotbook
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotbookError {
    /// Caller's fault, fixable by resubmission (HTTP 400).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested slot was taken between viewing and submitting (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid admin credential (HTTP 401/403).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// External calendar or token-refresh failure. Never fatal to
    /// availability or booking flows; callers degrade gracefully.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slotbook operations
pub type Result<T> = std::result::Result<T, SlotbookError>;
