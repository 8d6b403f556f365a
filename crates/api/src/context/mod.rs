//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use slotbook_core::{
    AvailabilityService, BookingCoordinator, BookingRepository, ConfigRepository,
    CredentialRepository, MeetingTypeRepository, NotificationSink, TenantRepository,
};
use slotbook_domain::{Result, SlotbookError, Tenant};
use slotbook_infra::config::{AppConfig, OAuthAppSettings};
use slotbook_infra::database::{
    SqliteBookingRepository, SqliteConfigRepository, SqliteCredentialRepository,
    SqliteMeetingTypeRepository, SqliteTenantRepository,
};
use slotbook_infra::integrations::calendar::providers::google::GoogleClient;
use slotbook_infra::integrations::calendar::providers::outlook::OutlookClient;
use slotbook_infra::integrations::calendar::{ProviderRegistry, ProviderSettings};
use slotbook_infra::notifications::{EmailSender, EmailSettings, WebhookSender, WebhookSettings};
use slotbook_infra::{
    DbManager, HttpClient, OAuthFlow, ProviderCalendarGateway, TokenVault,
};
use tracing::info;

/// Everything the HTTP handlers need, wired once at startup.
pub struct AppContext {
    pub config: AppConfig,
    pub db: DbManager,
    pub tenants: Arc<dyn TenantRepository>,
    pub configs: Arc<dyn ConfigRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub meeting_types: Arc<dyn MeetingTypeRepository>,
    pub availability: AvailabilityService,
    pub coordinator: BookingCoordinator,
    pub oauth: OAuthFlow,
}

impl AppContext {
    /// Open the database, run migrations, and wire services together.
    pub fn new(config: AppConfig) -> Result<Self> {
        let db = DbManager::new(&config.database.path, config.database.pool_size)?;
        db.run_migrations()?;

        let pool = db.pool();
        let tenants: Arc<dyn TenantRepository> =
            Arc::new(SqliteTenantRepository::new(pool.clone()));
        let configs: Arc<dyn ConfigRepository> =
            Arc::new(SqliteConfigRepository::new(pool.clone()));
        let bookings: Arc<dyn BookingRepository> =
            Arc::new(SqliteBookingRepository::new(pool.clone()));
        let meeting_types: Arc<dyn MeetingTypeRepository> =
            Arc::new(SqliteMeetingTypeRepository::new(pool.clone()));
        let credentials: Arc<dyn CredentialRepository> =
            Arc::new(SqliteCredentialRepository::new(pool));

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        let mut registry = ProviderRegistry::new();
        if let Some(settings) = &config.google {
            registry = registry
                .register(Arc::new(GoogleClient::new(http.clone(), provider_settings(settings))));
            info!("google calendar provider configured");
        }
        if let Some(settings) = &config.outlook {
            registry = registry.register(Arc::new(OutlookClient::new(
                http.clone(),
                provider_settings(settings),
            )));
            info!("outlook calendar provider configured");
        }

        let vault = Arc::new(TokenVault::new(credentials.clone(), registry.clone()));
        let gateway = Arc::new(ProviderCalendarGateway::new(vault, registry.clone()));

        let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();
        if let Some(email) = &config.email {
            sinks.push(Arc::new(EmailSender::new(
                http.clone(),
                EmailSettings {
                    api_key: email.api_key.clone(),
                    from: email.from.clone(),
                    api_base: None,
                },
            )));
            info!("email notifications enabled");
        }
        if let Some(webhook) = &config.webhook {
            sinks.push(Arc::new(WebhookSender::new(
                http,
                WebhookSettings { url: Some(webhook.url.clone()), secret: webhook.secret.clone() },
            )));
            info!("webhook notifications enabled");
        }

        let availability =
            AvailabilityService::new(configs.clone(), bookings.clone(), gateway.clone());
        let coordinator = BookingCoordinator::new(
            configs.clone(),
            bookings.clone(),
            meeting_types.clone(),
            gateway,
            sinks,
        );
        let oauth = OAuthFlow::new(registry, credentials, configs.clone());

        Ok(Self {
            config,
            db,
            tenants,
            configs,
            bookings,
            meeting_types,
            availability,
            coordinator,
            oauth,
        })
    }

    /// Resolve a tenant by its public slug.
    pub async fn tenant_by_slug(&self, slug: &str) -> Result<Tenant> {
        self.tenants
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| SlotbookError::NotFound(format!("tenant '{slug}'")))
    }
}

fn provider_settings(settings: &OAuthAppSettings) -> ProviderSettings {
    ProviderSettings {
        client_id: settings.client_id.clone(),
        client_secret: settings.client_secret.clone(),
        redirect_uri: settings.redirect_uri.clone(),
    }
}
