pub mod soundcloud;
pub mod youtube;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::{Credential, Platform};
use crate::error::CrosscastError;

pub use soundcloud::{SoundCloud, TrackSummary};
pub use youtube::YouTube;

/// Per-platform client registration, passed to an adapter's constructor.
/// Endpoint overrides exist so tests and alternate environments can point
/// an adapter at a stub server; `None` means the platform's real endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        ProviderConfig {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            auth_url: None,
            token_url: None,
            api_url: None,
        }
    }
}

/// Uniform surface over one media platform's OAuth flows.
///
/// Adapters hold their platform's endpoints and client registration and
/// delegate the actual exchanges to [`crate::auth::flow`]; adding a
/// platform means adding one adapter module.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// URL the user visits to grant access.
    fn sign_in_url(&self) -> Result<String, CrosscastError>;

    /// Exchange the authorization code returned by the grant page for an
    /// authenticated credential.
    async fn authenticate(&self, code: &str) -> Result<Credential, CrosscastError>;

    /// Build a credential from a refresh token obtained earlier and run
    /// the refresh grant.
    async fn refresh_token(&self, refresh_token: &str) -> Result<Credential, CrosscastError>;
}
