use crosscast::providers::ProviderConfig;

/// Provider settings pointed entirely at a wiremock server.
#[allow(dead_code)]
pub fn stub_provider_config(server_uri: &str) -> ProviderConfig {
    ProviderConfig {
        client_id: "test-id".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:8080/cb".to_string(),
        auth_url: Some(format!("{server_uri}/authorize")),
        token_url: Some(format!("{server_uri}/token")),
        api_url: Some(server_uri.to_string()),
    }
}

/// Canonical token endpoint response body.
#[allow(dead_code)]
pub fn token_body(access: &str, refresh: &str, expires_in: i64) -> serde_json::Value {
    serde_json::json!({
        "access_token": access,
        "expires_in": expires_in,
        "refresh_token": refresh,
        "scope": "read",
    })
}
