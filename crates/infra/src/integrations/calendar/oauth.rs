//! OAuth connect flow for tenant admins.
//!
//! `start` hands out the provider's authorization URL with an opaque state;
//! `complete` turns the callback into a stored credential and a connected
//! provider in the tenant's config.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use slotbook_core::{ConfigRepository, CredentialRepository};
use slotbook_domain::{
    CalendarProviderKind, OAuthCredential, ProviderProfile, Result, SlotbookError, Tenant,
};
use tracing::{info, instrument};

use super::providers::ProviderRegistry;

/// Round-tripped through the provider's `state` parameter, URL-safe
/// base64-encoded.
#[derive(Debug, Serialize, Deserialize)]
struct StatePayload {
    tenant_id: String,
    provider: CalendarProviderKind,
    nonce: String,
}

pub struct OAuthFlow {
    providers: ProviderRegistry,
    credentials: Arc<dyn CredentialRepository>,
    configs: Arc<dyn ConfigRepository>,
}

impl OAuthFlow {
    pub fn new(
        providers: ProviderRegistry,
        credentials: Arc<dyn CredentialRepository>,
        configs: Arc<dyn ConfigRepository>,
    ) -> Self {
        Self { providers, credentials, configs }
    }

    /// Authorization URL for the tenant to visit.
    #[instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
    pub fn start(&self, tenant: &Tenant, provider: CalendarProviderKind) -> Result<String> {
        if !provider.is_connected_kind() {
            return Err(SlotbookError::Validation("cannot connect provider 'none'".into()));
        }

        let state = encode_state(&StatePayload {
            tenant_id: tenant.id.clone(),
            provider,
            nonce: nonce(),
        })?;

        self.providers.client(provider)?.authorization_url(&state)
    }

    /// Handle the provider callback: exchange the code, store the
    /// credential, and mark the provider connected. Returns the tenant id
    /// and connected account profile.
    #[instrument(skip(self, code, state))]
    pub async fn complete(&self, code: &str, state: &str) -> Result<(String, ProviderProfile)> {
        let payload = decode_state(state)?;
        let client = self.providers.client(payload.provider)?;

        let token = client.exchange_code(code).await?;
        let refresh_token = token.refresh_token.ok_or_else(|| {
            SlotbookError::Auth(
                "provider did not issue a refresh token; ask for offline access".into(),
            )
        })?;

        let credential = OAuthCredential {
            tenant_id: payload.tenant_id.clone(),
            provider: payload.provider,
            access_token: token.access_token.clone(),
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            scope: token.scope.unwrap_or_default(),
        };

        // One connected provider at a time: discard any credential for the
        // other one before switching.
        for other in [CalendarProviderKind::Google, CalendarProviderKind::Outlook] {
            if other != payload.provider {
                self.credentials.delete(&payload.tenant_id, other).await?;
            }
        }
        self.credentials.store(&credential).await?;

        let profile = client.fetch_profile(&token.access_token).await?;
        self.configs
            .mark_provider_connected(&payload.tenant_id, payload.provider, &profile.email)
            .await?;

        info!(
            tenant_id = %payload.tenant_id,
            provider = %payload.provider,
            "calendar provider connected"
        );
        Ok((payload.tenant_id, profile))
    }

    /// Remove the credential and clear the connection flags.
    #[instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
    pub async fn disconnect(&self, tenant: &Tenant, provider: CalendarProviderKind) -> Result<()> {
        self.credentials.delete(&tenant.id, provider).await?;
        self.configs.mark_provider_disconnected(&tenant.id).await?;
        info!(provider = %provider, "calendar provider disconnected");
        Ok(())
    }
}

fn nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn encode_state(payload: &StatePayload) -> Result<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| SlotbookError::Internal(format!("failed to encode oauth state: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_state(state: &str) -> Result<StatePayload> {
    let bytes = URL_SAFE_NO_PAD
        .decode(state)
        .map_err(|_| SlotbookError::Validation("malformed oauth state".into()))?;
    serde_json::from_slice(&bytes)
        .map_err(|_| SlotbookError::Validation("malformed oauth state".into()))
}
