use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::auth::{self, Credential, Platform, Token};
use crate::error::CrosscastError;
use crate::providers::{ProviderAdapter, ProviderConfig};

const AUTH_URL: &str = "https://soundcloud.com/connect";
const TOKEN_URL: &str = "https://api.soundcloud.com/oauth2/token";
const API_URL: &str = "https://api.soundcloud.com";

/// One track from the user's catalogue, as reported by `/me/tracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackSummary {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub permalink_url: Option<String>,
}

/// SoundCloud adapter: OAuth against the connect endpoints plus track
/// upload and listing.
#[derive(Debug, Clone)]
pub struct SoundCloud {
    config: ProviderConfig,
}

impl SoundCloud {
    pub fn new(config: ProviderConfig) -> Self {
        SoundCloud { config }
    }

    fn auth_url(&self) -> &str {
        self.config.auth_url.as_deref().unwrap_or(AUTH_URL)
    }

    fn token_url(&self) -> &str {
        self.config.token_url.as_deref().unwrap_or(TOKEN_URL)
    }

    fn api_url(&self) -> &str {
        self.config
            .api_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .unwrap_or(API_URL)
    }

    fn credential(&self) -> Result<Credential, CrosscastError> {
        Credential::new(
            &self.config.client_id,
            &self.config.client_secret,
            &self.config.redirect_uri,
            Platform::SoundCloud,
        )
    }

    pub async fn fresh_token(&self, credential: &Credential) -> Result<Token, CrosscastError> {
        auth::ensure_fresh(credential, self.token_url()).await
    }

    /// Upload an audio file as a new track.
    pub async fn upload(
        &self,
        credential: &Credential,
        path: &Path,
        title: &str,
    ) -> Result<serde_json::Value, CrosscastError> {
        let token = self.fresh_token(credential).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media = tokio::fs::read(path).await?;

        let form = reqwest::multipart::Form::new()
            .text("track[title]", title.to_string())
            .part(
                "track[asset_data]",
                reqwest::multipart::Part::bytes(media).file_name(file_name),
            );

        tracing::info!(title, path = %path.display(), "uploading track");
        let resp = credential
            .http()
            .post(format!("{}/tracks", self.api_url()))
            .bearer_auth(&token.access_token)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CrosscastError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| CrosscastError::Decode(e.to_string()))
    }

    /// List the authenticated user's tracks. A body that fails to decode
    /// is an error, never an empty listing.
    pub async fn list_tracks(
        &self,
        credential: &Credential,
    ) -> Result<Vec<TrackSummary>, CrosscastError> {
        let token = self.fresh_token(credential).await?;

        let resp = credential
            .http()
            .get(format!("{}/me/tracks.json", self.api_url()))
            .query(&[("oauth_token", token.access_token.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CrosscastError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| CrosscastError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProviderAdapter for SoundCloud {
    fn platform(&self) -> Platform {
        Platform::SoundCloud
    }

    fn sign_in_url(&self) -> Result<String, CrosscastError> {
        auth::sign_in_url(
            self.auth_url(),
            &[
                ("client_id", &self.config.client_id),
                ("redirect_uri", &self.config.redirect_uri),
                ("response_type", "code"),
                ("scope", "non-expiring"),
            ],
        )
    }

    async fn authenticate(&self, code: &str) -> Result<Credential, CrosscastError> {
        let credential = self.credential()?;
        auth::exchange_code(&credential, code, self.token_url()).await?;
        Ok(credential)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Credential, CrosscastError> {
        let credential = self.credential()?;
        credential.seed_refresh_token(refresh_token).await;
        auth::refresh(&credential, self.token_url()).await?;
        Ok(credential)
    }
}
