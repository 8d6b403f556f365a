//! Shared fixtures for `slotbook-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use slotbook_core::{ConfigRepository, TenantRepository};
use slotbook_domain::{SchedulerConfig, Tenant};
use slotbook_infra::database::{
    SqliteBookingRepository, SqliteConfigRepository, SqliteCredentialRepository,
    SqliteMeetingTypeRepository, SqliteTenantRepository,
};
use slotbook_infra::http::HttpClient;
use slotbook_infra::DbManager;
use tempfile::TempDir;

/// An opened, migrated database in a temp directory plus its repositories.
pub struct TestDb {
    // Held so the directory outlives the pool.
    _dir: TempDir,
    pub manager: DbManager,
    pub tenants: Arc<SqliteTenantRepository>,
    pub configs: Arc<SqliteConfigRepository>,
    pub meeting_types: Arc<SqliteMeetingTypeRepository>,
    pub bookings: Arc<SqliteBookingRepository>,
    pub credentials: Arc<SqliteCredentialRepository>,
}

impl TestDb {
    pub fn open() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let manager = DbManager::new(dir.path().join("slotbook.db"), 4).expect("open database");
        manager.run_migrations().expect("run migrations");

        let pool = manager.pool();
        Self {
            _dir: dir,
            tenants: Arc::new(SqliteTenantRepository::new(pool.clone())),
            configs: Arc::new(SqliteConfigRepository::new(pool.clone())),
            meeting_types: Arc::new(SqliteMeetingTypeRepository::new(pool.clone())),
            bookings: Arc::new(SqliteBookingRepository::new(pool.clone())),
            credentials: Arc::new(SqliteCredentialRepository::new(pool)),
            manager,
        }
    }

    /// Insert the standard test tenant and its default config.
    pub async fn seed_tenant(&self) -> Tenant {
        let tenant = Tenant {
            id: "t1".into(),
            slug: "acme".into(),
            display_name: "Acme Consulting".into(),
            email: "owner@acme.test".into(),
        };
        self.insert_tenant(&tenant);
        self.configs
            .upsert(&SchedulerConfig::defaults(&tenant.id, "Acme Consulting"))
            .await
            .expect("seed config");
        tenant
    }

    pub fn insert_tenant(&self, tenant: &Tenant) {
        let conn = self.manager.get_connection().expect("connection");
        conn.execute(
            "INSERT INTO tenants (id, slug, display_name, email, created_at) \
             VALUES (?1, ?2, ?3, ?4, 0)",
            rusqlite::params![tenant.id, tenant.slug, tenant.display_name, tenant.email],
        )
        .expect("insert tenant");
    }

    pub fn insert_meeting_type(&self, id: &str, name: &str, duration: u32, location_type: &str) {
        let conn = self.manager.get_connection().expect("connection");
        conn.execute(
            "INSERT INTO meeting_types (id, tenant_id, name, duration_minutes, location_type) \
             VALUES (?1, 't1', ?2, ?3, ?4)",
            rusqlite::params![id, name, duration, location_type],
        )
        .expect("insert meeting type");
    }
}

/// Fast-failing HTTP client for wiremock tests.
pub fn test_http_client() -> HttpClient {
    HttpClient::builder()
        .timeout(std::time::Duration::from_secs(2))
        .max_attempts(1)
        .build()
        .expect("build http client")
}

pub async fn tenant_exists(tenants: &SqliteTenantRepository, slug: &str) -> bool {
    tenants.find_by_slug(slug).await.expect("lookup").is_some()
}
