//! OAuth token lifecycle.
//!
//! The vault is the only component that hands out access tokens. Expiry is
//! checked against a 5-minute buffer; refreshes are serialised per
//! (tenant, provider) so concurrent requests trigger at most one refresh.

use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use slotbook_core::CredentialRepository;
use slotbook_domain::{
    CalendarProviderKind, OAuthCredential, Result, SlotbookError,
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::providers::ProviderRegistry;

type RefreshKey = (String, CalendarProviderKind);

pub struct TokenVault {
    credentials: Arc<dyn CredentialRepository>,
    providers: ProviderRegistry,
    refresh_locks: DashMap<RefreshKey, Arc<Mutex<()>>>,
}

impl TokenVault {
    pub fn new(credentials: Arc<dyn CredentialRepository>, providers: ProviderRegistry) -> Self {
        Self {
            credentials,
            providers,
            refresh_locks: DashMap::new(),
        }
    }

    /// A usable access token for (tenant, provider), refreshing if the
    /// stored one expires within the buffer.
    ///
    /// `None` means "not connected": no credential stored, or the refresh
    /// failed. A terminal refresh failure (`invalid_grant`) deletes the
    /// credential so the tenant shows up as disconnected from then on;
    /// a transient failure keeps it for the next attempt.
    #[instrument(skip(self))]
    pub async fn access_token(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<Option<String>> {
        let Some(credential) = self.credentials.load(tenant_id, provider).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if credential.is_fresh(now) {
            return Ok(Some(credential.access_token));
        }

        let lock = self.refresh_lock(tenant_id, provider);
        let _guard = lock.lock().await;

        // Whoever held the lock first may have refreshed already.
        let Some(credential) = self.credentials.load(tenant_id, provider).await? else {
            return Ok(None);
        };
        if credential.is_fresh(Utc::now()) {
            return Ok(Some(credential.access_token));
        }

        self.refresh(credential).await
    }

    /// Whether a credential exists for (tenant, provider).
    pub async fn is_connected(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<bool> {
        Ok(self.credentials.load(tenant_id, provider).await?.is_some())
    }

    /// Drop the stored credential.
    #[instrument(skip(self))]
    pub async fn disconnect(
        &self,
        tenant_id: &str,
        provider: CalendarProviderKind,
    ) -> Result<()> {
        self.credentials.delete(tenant_id, provider).await
    }

    async fn refresh(&self, credential: OAuthCredential) -> Result<Option<String>> {
        let client = self.providers.client(credential.provider)?;

        match client.refresh_token(&credential.refresh_token).await {
            Ok(token) => {
                let updated = OAuthCredential {
                    access_token: token.access_token.clone(),
                    // Providers may rotate the refresh token; keep the old
                    // one when they don't.
                    refresh_token: token
                        .refresh_token
                        .unwrap_or(credential.refresh_token),
                    expires_at: Utc::now() + Duration::seconds(token.expires_in),
                    scope: token.scope.unwrap_or(credential.scope),
                    ..credential
                };
                self.credentials.store(&updated).await?;
                info!(
                    tenant_id = %updated.tenant_id,
                    provider = %updated.provider,
                    "access token refreshed"
                );
                Ok(Some(token.access_token))
            }
            Err(SlotbookError::Auth(reason)) => {
                warn!(
                    tenant_id = %credential.tenant_id,
                    provider = %credential.provider,
                    %reason,
                    "refresh token rejected, removing credential"
                );
                self.credentials
                    .delete(&credential.tenant_id, credential.provider)
                    .await?;
                Ok(None)
            }
            Err(err) => {
                warn!(
                    tenant_id = %credential.tenant_id,
                    provider = %credential.provider,
                    error = %err,
                    "token refresh failed transiently, keeping credential"
                );
                Ok(None)
            }
        }
    }

    fn refresh_lock(&self, tenant_id: &str, provider: CalendarProviderKind) -> Arc<Mutex<()>> {
        self.refresh_locks
            .entry((tenant_id.to_string(), provider))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
