use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::auth::expiry;
use crate::error::CrosscastError;

/// Default timeout for outbound token and API requests.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Platforms this client can authenticate against.
///
/// The legacy wire protocol identified platforms by bare integers
/// (SoundCloud 0, YouTube 1); the enum keeps invalid values out of
/// adapter dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    SoundCloud,
    YouTube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::SoundCloud => "soundcloud",
            Platform::YouTube => "youtube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = CrosscastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "soundcloud" => Ok(Platform::SoundCloud),
            "youtube" => Ok(Platform::YouTube),
            other => Err(CrosscastError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Current OAuth state for one platform account.
///
/// `expires_at` is always derived from `expires_in` at the moment an
/// exchange completes; it is never set independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub scope: String,
    pub refresh_token: String,
    pub platform: Platform,
}

impl Token {
    /// An unauthenticated token: no access token, already expired.
    pub fn empty(platform: Platform) -> Self {
        Token {
            access_token: String::new(),
            expires_in: 0,
            expires_at: DateTime::<Utc>::MIN_UTC,
            scope: String::new(),
            refresh_token: String::new(),
            platform,
        }
    }

    pub fn is_expired(&self) -> bool {
        expiry::is_expired(self.expires_at)
    }
}

/// Client identity and token state for one platform/account pairing.
///
/// The embedded token is the only mutable shared state; the auth flow is
/// its sole writer, and refreshes are serialized per credential through
/// `refresh_gate`. The `reqwest::Client` is cheap to clone and safe to
/// share across concurrent requests.
#[derive(Debug)]
pub struct Credential {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    platform: Platform,
    token: RwLock<Token>,
    refresh_gate: Mutex<()>,
    http: reqwest::Client,
}

impl Credential {
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        platform: Platform,
    ) -> Result<Self, CrosscastError> {
        Self::with_timeout(
            client_id,
            client_secret,
            redirect_uri,
            platform,
            DEFAULT_HTTP_TIMEOUT,
        )
    }

    pub fn with_timeout(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        platform: Platform,
        timeout: Duration,
    ) -> Result<Self, CrosscastError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Credential {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            platform,
            token: RwLock::new(Token::empty(platform)),
            refresh_gate: Mutex::new(()),
            http,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Snapshot of the current token state.
    pub async fn token(&self) -> Token {
        self.token.read().await.clone()
    }

    pub async fn access_token(&self) -> String {
        self.token.read().await.access_token.clone()
    }

    pub async fn is_expired(&self) -> bool {
        self.token.read().await.is_expired()
    }

    /// Seed a refresh token obtained elsewhere, so the refresh flow can run
    /// without a prior code exchange in this process.
    pub async fn seed_refresh_token(&self, refresh_token: &str) {
        let mut token = self.token.write().await;
        token.refresh_token = refresh_token.to_string();
    }

    pub(crate) async fn store_token(&self, new: Token) {
        *self.token.write().await = new;
    }

    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_gate.lock().await
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
