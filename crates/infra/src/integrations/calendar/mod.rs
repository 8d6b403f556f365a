//! Calendar provider integration: wire clients, token lifecycle, the
//! gateway adapter, and the OAuth connect flow.

pub mod gateway;
pub mod oauth;
pub mod providers;
pub mod token_vault;

pub use gateway::ProviderCalendarGateway;
pub use oauth::OAuthFlow;
pub use providers::{ProviderClient, ProviderRegistry, ProviderSettings, TokenResponse};
pub use token_vault::TokenVault;
