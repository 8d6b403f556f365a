//! # Slotbook API
//!
//! HTTP layer - routes and the application entry point.
//!
//! This crate contains:
//! - The axum route table and JSON envelope
//! - Application context (dependency injection)
//! - Main entry point and setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Exposes the public booking endpoints and the admin surface

pub mod context;
pub mod response;
pub mod routes;

pub use context::AppContext;
pub use response::{ApiError, ApiResponse};
pub use routes::router;
