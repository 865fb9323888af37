use std::path::Path;

use async_trait::async_trait;

use crate::auth::{self, Credential, Platform, Token};
use crate::error::CrosscastError;
use crate::providers::{ProviderAdapter, ProviderConfig};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
const SCOPE: &str = "https://www.googleapis.com/auth/youtube";

/// YouTube adapter: Google OAuth endpoints plus the multipart video
/// upload API.
#[derive(Debug, Clone)]
pub struct YouTube {
    config: ProviderConfig,
}

impl YouTube {
    pub fn new(config: ProviderConfig) -> Self {
        YouTube { config }
    }

    fn auth_url(&self) -> &str {
        self.config.auth_url.as_deref().unwrap_or(AUTH_URL)
    }

    fn token_url(&self) -> &str {
        self.config.token_url.as_deref().unwrap_or(TOKEN_URL)
    }

    fn upload_url(&self) -> String {
        match self.config.api_url.as_deref() {
            Some(base) => format!("{}/upload/youtube/v3/videos", base.trim_end_matches('/')),
            None => UPLOAD_URL.to_string(),
        }
    }

    fn credential(&self) -> Result<Credential, CrosscastError> {
        Credential::new(
            &self.config.client_id,
            &self.config.client_secret,
            &self.config.redirect_uri,
            Platform::YouTube,
        )
    }

    /// Current token for the credential, refreshed first if it has lapsed.
    pub async fn fresh_token(&self, credential: &Credential) -> Result<Token, CrosscastError> {
        auth::ensure_fresh(credential, self.token_url()).await
    }

    /// Upload a video file with the given title. Returns the video
    /// resource the API reports back.
    pub async fn upload(
        &self,
        credential: &Credential,
        path: &Path,
        title: &str,
    ) -> Result<serde_json::Value, CrosscastError> {
        let token = self.fresh_token(credential).await?;

        let snippet = serde_json::json!({ "snippet": { "title": title } });
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media = tokio::fs::read(path).await?;

        let form = reqwest::multipart::Form::new()
            .part(
                "snippet",
                reqwest::multipart::Part::text(snippet.to_string())
                    .mime_str("application/json")?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(media).file_name(file_name),
            );

        tracing::info!(title, path = %path.display(), "uploading video");
        let resp = credential
            .http()
            .post(self.upload_url())
            .query(&[("part", "snippet"), ("uploadType", "multipart")])
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
}

#[async_trait]
impl ProviderAdapter for YouTube {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn sign_in_url(&self) -> Result<String, CrosscastError> {
        auth::sign_in_url(
            self.auth_url(),
            &[
                ("client_id", &self.config.client_id),
                ("redirect_uri", &self.config.redirect_uri),
                ("scope", SCOPE),
                ("response_type", "code"),
                // offline access is what makes Google hand out a refresh token
                ("access_type", "offline"),
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
