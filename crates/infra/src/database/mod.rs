//! SQLite persistence layer.

mod booking_repository;
mod config_repository;
mod credential_repository;
mod manager;
mod meeting_type_repository;
mod tenant_repository;

pub use booking_repository::SqliteBookingRepository;
pub use config_repository::SqliteConfigRepository;
pub use credential_repository::SqliteCredentialRepository;
pub use manager::DbManager;
pub use meeting_type_repository::SqliteMeetingTypeRepository;
pub use tenant_repository::SqliteTenantRepository;
