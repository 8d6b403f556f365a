//! CalendarGateway implementation over the token vault and provider clients.

use std::sync::Arc;

use async_trait::async_trait;
use slotbook_core::{BusyQuery, CalendarGateway};
use slotbook_domain::{
    BusyInterval, CalendarProviderKind, EventDraft, EventPatch, ProviderProfile, Result,
};
use tracing::instrument;

use super::providers::ProviderRegistry;
use super::token_vault::TokenVault;

/// Routes gateway calls to the tenant's configured provider.
///
/// Every operation first asks the vault for a token; no token means "not
/// connected" and the operation is a no-op, never an error. Provider
/// failures pass through as `Provider` for the callers' degrade paths.
pub struct ProviderCalendarGateway {
    vault: Arc<TokenVault>,
    providers: ProviderRegistry,
}

impl ProviderCalendarGateway {
    pub fn new(vault: Arc<TokenVault>, providers: ProviderRegistry) -> Self {
        Self { vault, providers }
    }

    async fn token_for(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<Option<String>> {
        if !provider.is_connected_kind() || !self.providers.is_configured(provider) {
            return Ok(None);
        }
        self.vault.access_token(tenant_id, provider).await
    }
}

#[async_trait]
impl CalendarGateway for ProviderCalendarGateway {
    #[instrument(skip(self, query))]
    async fn fetch_busy_intervals(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        query: &BusyQuery,
    ) -> Result<Vec<BusyInterval>> {
        let Some(token) = self.token_for(tenant_id, provider).await? else {
            return Ok(Vec::new());
        };
        self.providers.client(provider)?.fetch_busy(&token, query).await
    }

    #[instrument(skip(self, draft))]
    async fn create_event(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        draft: &EventDraft,
    ) -> Result<Option<String>> {
        let Some(token) = self.token_for(tenant_id, provider).await? else {
            return Ok(None);
        };
        let event_id = self.providers.client(provider)?.create_event(&token, draft).await?;
        Ok(Some(event_id))
    }

    #[instrument(skip(self, patch))]
    async fn update_event(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<bool> {
        let Some(token) = self.token_for(tenant_id, provider).await? else {
            return Ok(false);
        };
        self.providers.client(provider)?.update_event(&token, event_id, patch).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete_event(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
        event_id: &str,
    ) -> Result<bool> {
        let Some(token) = self.token_for(tenant_id, provider).await? else {
            return Ok(false);
        };
        self.providers.client(provider)?.delete_event(&token, event_id).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn fetch_profile(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<Option<ProviderProfile>> {
        let Some(token) = self.token_for(tenant_id, provider).await? else {
            return Ok(None);
        };
        let profile = self.providers.client(provider)?.fetch_profile(&token).await?;
        Ok(Some(profile))
    }

    #[instrument(skip(self))]
    async fn is_connected(&self, tenant_id: &str, provider: CalendarProviderKind) -> Result<bool> {
        if !provider.is_connected_kind() {
            return Ok(false);
        }
        self.vault.is_connected(tenant_id, provider).await
    }
}
