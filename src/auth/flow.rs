use serde::Deserialize;

use crate::auth::credential::{Credential, Token};
use crate::auth::expiry;
use crate::error::CrosscastError;

/// Raw token response from a provider's token endpoint. Providers disagree
/// on which optional fields they send; the canonical shape is
/// `{access_token, expires_in, scope, refresh_token}`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Exchange an authorization code for a token, updating the credential
/// in place on success.
pub async fn exchange_code(
    credential: &Credential,
    code: &str,
    token_url: &str,
) -> Result<(), CrosscastError> {
    tracing::debug!(platform = %credential.platform(), "exchanging authorization code");
    let params = [
        ("client_id", credential.client_id()),
        ("client_secret", credential.client_secret()),
        ("redirect_uri", credential.redirect_uri()),
        ("grant_type", "authorization_code"),
        ("code", code),
    ];
    token_request(credential, token_url, &params).await
}

/// Exchange the stored refresh token for a fresh token, overwriting the
/// credential's token on success. Refreshes for one credential are
/// serialized; concurrent callers queue behind the in-flight exchange.
pub async fn refresh(credential: &Credential, token_url: &str) -> Result<(), CrosscastError> {
    let _gate = credential.lock_refresh().await;
    refresh_locked(credential, token_url).await
}

/// Return a non-expired token for the credential, refreshing at most once
/// if the current one has lapsed. Callers racing on the same credential
/// all observe the token produced by the single winning refresh.
pub async fn ensure_fresh(
    credential: &Credential,
    token_url: &str,
) -> Result<Token, CrosscastError> {
    if !credential.is_expired().await {
        return Ok(credential.token().await);
    }

    let _gate = credential.lock_refresh().await;

    // Re-check under the lock: a concurrent caller may have refreshed
    // while we waited for the gate.
    if !credential.is_expired().await {
        return Ok(credential.token().await);
    }

    tracing::info!(platform = %credential.platform(), "access token expired, refreshing");
    refresh_locked(credential, token_url).await?;
    Ok(credential.token().await)
}

async fn refresh_locked(credential: &Credential, token_url: &str) -> Result<(), CrosscastError> {
    let refresh_token = credential.token().await.refresh_token;
    if refresh_token.is_empty() {
        return Err(CrosscastError::MissingRefreshToken);
    }

    let params = [
        ("client_id", credential.client_id()),
        ("client_secret", credential.client_secret()),
        ("refresh_token", refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];
    token_request(credential, token_url, &params).await
}

/// Shared protocol shape for both grant flows: form-encoded POST, JSON
/// response, expiry stamped at completion. The credential's token is only
/// overwritten once the whole response has decoded, so a failed exchange
/// leaves the prior token untouched.
async fn token_request(
    credential: &Credential,
    token_url: &str,
    params: &[(&str, &str)],
) -> Result<(), CrosscastError> {
    let resp = credential
        .http()
        .post(token_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .form(params)
        .send()
        .await?;

    let status = resp.status();
    // The token endpoint contract is exactly 200; any other status, even a
    // 2xx, is an error.
    if status != reqwest::StatusCode::OK {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "token endpoint rejected request");
        return Err(CrosscastError::UpstreamStatus {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: TokenResponse = resp
        .json()
        .await
        .map_err(|e| CrosscastError::Decode(e.to_string()))?;

    let prior = credential.token().await;
    let expires_in = parsed.expires_in.unwrap_or(0);
    let new = Token {
        access_token: parsed.access_token,
        expires_in,
        expires_at: expiry::expiry_from_now(expires_in),
        scope: parsed.scope.unwrap_or_default(),
        // Providers commonly elide refresh_token on the refresh grant;
        // keep the one we already hold rather than clobbering it.
        refresh_token: parsed.refresh_token.unwrap_or(prior.refresh_token),
        platform: credential.platform(),
    };
    credential.store_token(new).await;

    tracing::debug!(platform = %credential.platform(), "token updated");
    Ok(())
}
